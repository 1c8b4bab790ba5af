//! Unit tests for the default integrity resolver.

use flatlock::core::FlatlockError;
use flatlock::integrity::{IntegritySource, Sha1IntegrityResolver};
use flatlock::manifest::{Dist, Manifest};

#[tokio::test]
async fn dist_shasum_is_used_when_legacy_field_missing() {
    let mut manifest = Manifest::new("4.17.21");
    manifest.dist = Some(Dist {
        shasum: Some("679591c564c3bffaae8454cf0b3df370c3d6911c".to_string()),
        ..Dist::default()
    });

    let integrity = Sha1IntegrityResolver.resolve_integrity(None, None, &manifest).await.unwrap();

    assert_eq!(integrity, "sha1-Z5WRxWTDv/quhFTPCz3zcMPWkRw=");
}

#[tokio::test]
async fn node_sha1_beats_manifest_shasum() {
    let manifest = Manifest::new("1.0.0").with_shasum("679591c564c3bffaae8454cf0b3df370c3d6911c");

    let integrity = Sha1IntegrityResolver
        .resolve_integrity(Some("sha1-fromnode= sha512-other"), None, &manifest)
        .await
        .unwrap();

    assert_eq!(integrity, "sha1-fromnode=");
}

#[tokio::test]
async fn short_shasum_is_rejected() {
    let mut manifest = Manifest::new("1.0.0").with_shasum("abcd");
    manifest.name = Some("tiny".to_string());

    let err = Sha1IntegrityResolver.resolve_integrity(None, None, &manifest).await.unwrap_err();

    match err.downcast_ref::<FlatlockError>() {
        Some(FlatlockError::IntegrityUnresolvable {
            name,
            reason,
            ..
        }) => {
            assert_eq!(name, "tiny");
            assert!(reason.contains("expected 40"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
