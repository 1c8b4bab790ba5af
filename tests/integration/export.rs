//! Exported lock records and their serialized form.

use flatlock::flatten::TreeFlattener;
use flatlock::integrity::Sha1IntegrityResolver;
use flatlock::manifest::Manifest;
use flatlock::test_utils::StaticManifests;
use flatlock::tree::Node;
use std::sync::Arc;

const SHASUM: &str = "679591c564c3bffaae8454cf0b3df370c3d6911c";

#[tokio::test]
async fn exported_records_serialize_like_lock_entries() {
    let pkg = Arc::new(
        Node::new("lodash", "4.17.21")
            .with_address("lodash")
            .with_integrity("sha512-v2kDEe57lecTulaDIuNTPy3Ry4gLGJ6Z1O3vE1krgXZNrsQ+LFTGHVxVjcXPs17LhbZVGedAJv8XZ1tvj5FvSg=="),
    );
    let root = Arc::new(Node::new("app", "1.0.0").with_dependency("lodash", pkg));
    let manifests = StaticManifests::new().with(
        "lodash",
        "4.17.21",
        Manifest::new("4.17.21")
            .with_legacy_resolved("https://registry.npmjs.org/lodash/-/lodash-4.17.21.tgz")
            .with_shasum(SHASUM),
    );
    let mut flattener = TreeFlattener::new(
        Manifest::new("1.0.0").with_dependency("lodash", "^4.17.21"),
        manifests,
        Sha1IntegrityResolver,
    );

    flattener.flatten_tree(&root).await.unwrap();
    let value = serde_json::to_value(flattener.export_entries()).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "lodash@^4.17.21": {
                "name": "lodash",
                "version": "4.17.21",
                "integrity": "sha1-Z5WRxWTDv/quhFTPCz3zcMPWkRw=",
                "resolved": "https://registry.npmjs.org/lodash/-/lodash-4.17.21.tgz"
            }
        })
    );
}

#[tokio::test]
async fn export_keeps_first_label_position_on_collision() {
    let c = Arc::new(Node::new("c", "1.0.0").with_address("c"));
    let a = Arc::new(Node::new("a", "1.0.0").with_address("a").with_dependency("c", Arc::clone(&c)));
    let b = Arc::new(Node::new("b", "1.0.0").with_address("b").with_dependency("c", c));
    let root = Arc::new(Node::new("app", "1.0.0").with_dependency("a", a).with_dependency("b", b));
    let manifests = StaticManifests::new()
        .with("a", "1.0.0", Manifest::new("1.0.0").with_dependency("c", "^1.0.0").with_shasum(SHASUM))
        .with("b", "1.0.0", Manifest::new("1.0.0").with_dependency("c", "^1.0.0").with_shasum(SHASUM))
        .with("c", "1.0.0", Manifest::new("1.0.0").with_shasum(SHASUM));
    let mut flattener = TreeFlattener::new(
        Manifest::new("1.0.0").with_dependency("b", "^1.0.0").with_dependency("a", "^1.0.0"),
        manifests,
        Sha1IntegrityResolver,
    );

    flattener.flatten_tree(&root).await.unwrap();

    let exported = flattener.export_entries();
    let labels: Vec<&str> = exported.keys().map(String::as_str).collect();
    // Root manifest declares b before a, so b's entry is created first
    assert_eq!(labels, ["b@^1.0.0", "a@^1.0.0", "c@^1.0.0"]);
    assert_eq!(flattener.entry("c", "1.0.0").unwrap().semvers().len(), 2);
}
