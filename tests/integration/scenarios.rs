//! Flattening scenarios over whole trees.

use flatlock::flatten::TreeFlattener;
use flatlock::integrity::Sha1IntegrityResolver;
use flatlock::manifest::Manifest;
use flatlock::test_utils::{StaticIntegrity, StaticManifests, TreeFixture, init_test_logging};
use flatlock::tree::Node;
use std::sync::Arc;

fn installed(name: &str, version: &str, address: &str) -> Node {
    Node::new(name, version).with_address(address)
}

#[tokio::test]
async fn diamond_dependency_yields_two_labels_for_one_version() {
    init_test_logging(None);
    let fixture = TreeFixture::diamond();
    let mut flattener = fixture.flattener();

    flattener.flatten_tree(&fixture.root).await.unwrap();
    let exported = flattener.export_entries();

    assert_eq!(exported["c@^2.0.0"].version, "2.0.0");
    assert_eq!(exported["c@~2.0.0"].version, "2.0.0");
    assert!(Arc::ptr_eq(&exported["c@^2.0.0"].node, &exported["c@~2.0.0"].node));
    assert!(!exported.keys().any(|label| label.starts_with("app@")));
}

#[tokio::test]
async fn hoisted_and_nested_versions_stay_separate() {
    // app -> lodash@^4 (hoisted 4.17.21), app -> old-lib -> lodash@^3 (nested 3.10.1)
    let nested = Arc::new(installed("lodash", "3.10.1", "old-lib:lodash"));
    let hoisted = Arc::new(installed("lodash", "4.17.21", "lodash"));
    let old_lib = Arc::new(installed("old-lib", "1.0.0", "old-lib").with_dependency("lodash", nested));
    let root = Arc::new(
        Node::new("app", "1.0.0")
            .with_dependency("lodash", hoisted)
            .with_dependency("old-lib", old_lib),
    );

    let manifests = StaticManifests::new()
        .with("lodash", "4.17.21", Manifest::new("4.17.21"))
        .with("lodash", "3.10.1", Manifest::new("3.10.1"))
        .with("old-lib", "1.0.0", Manifest::new("1.0.0").with_dependency("lodash", "^3.0.0"));
    let root_manifest = Manifest::new("1.0.0")
        .with_dependency("lodash", "^4.17.0")
        .with_dependency("old-lib", "^1.0.0");
    let mut flattener = TreeFlattener::new(root_manifest, manifests, StaticIntegrity::new());

    flattener.flatten_tree(&root).await.unwrap();
    let exported = flattener.export_entries();

    assert_eq!(exported.len(), 3);
    assert_eq!(exported["lodash@^4.17.0"].version, "4.17.21");
    assert_eq!(exported["lodash@^3.0.0"].version, "3.10.1");
    assert_eq!(exported["old-lib@^1.0.0"].dependencies["lodash"], "^3.0.0");
}

#[tokio::test]
async fn same_version_at_many_addresses_is_fetched_once() {
    let shared_a = Arc::new(installed("ms", "2.1.3", "debug:ms"));
    let shared_b = Arc::new(installed("ms", "2.1.3", "send:ms"));
    let debug = Arc::new(installed("debug", "4.3.4", "debug").with_dependency("ms", shared_a));
    let send = Arc::new(installed("send", "0.18.0", "send").with_dependency("ms", shared_b));
    let root = Arc::new(
        Node::new("app", "1.0.0").with_dependency("debug", debug).with_dependency("send", send),
    );

    let manifests = StaticManifests::new()
        .with("debug", "4.3.4", Manifest::new("4.3.4").with_dependency("ms", "2.1.2"))
        .with("send", "0.18.0", Manifest::new("0.18.0").with_dependency("ms", "2.1.3"))
        .with("ms", "2.1.3", Manifest::new("2.1.3"));
    let root_manifest =
        Manifest::new("1.0.0").with_dependency("debug", "^4.3.0").with_dependency("send", "~0.18.0");
    let mut flattener = TreeFlattener::new(root_manifest, manifests.clone(), StaticIntegrity::new());

    flattener.flatten_tree(&root).await.unwrap();

    // debug, ms, send; the second ms node is served from the cache
    assert_eq!(manifests.calls(), 3);
    let entry = flattener.entry("ms", "2.1.3").unwrap();
    assert_eq!(entry.semvers(), ["2.1.2", "2.1.3"]);
    let exported = flattener.export_entries();
    let labels: Vec<&str> = exported.keys().map(String::as_str).collect();
    assert_eq!(labels, ["debug@^4.3.0", "send@~0.18.0", "ms@2.1.2", "ms@2.1.3"]);
}

#[tokio::test]
async fn bundled_subtree_is_left_out() {
    let bundled = Arc::new(installed("vendored", "1.0.0", "tool:vendored").bundled());
    let tool = Arc::new(installed("tool", "2.0.0", "tool").with_dependency("vendored", bundled));
    let root = Arc::new(Node::new("app", "1.0.0").with_dependency("tool", tool));

    let manifests = StaticManifests::new()
        .with("tool", "2.0.0", Manifest::new("2.0.0").with_dependency("vendored", "^1.0.0"));
    let mut flattener = TreeFlattener::new(
        Manifest::new("1.0.0").with_dependency("tool", "^2.0.0"),
        manifests,
        StaticIntegrity::new(),
    );

    flattener.flatten_tree(&root).await.unwrap();
    let exported = flattener.export_entries();

    assert_eq!(exported.keys().collect::<Vec<_>>(), ["tool@^2.0.0"]);
    assert!(flattener.entry("vendored", "1.0.0").unwrap().name().is_none());
}

#[tokio::test]
async fn git_dependency_uses_manifest_version() {
    let git_dep = Arc::new(
        installed("widget", "github:acme/widget#v3", "widget")
            .with_resolved("git+https://github.com/acme/widget.git#abc123"),
    );
    let root = Arc::new(Node::new("app", "1.0.0").with_dependency("widget", git_dep));
    let manifests = StaticManifests::new()
        .with("widget", "github:acme/widget#v3", Manifest::new("3.1.4"));
    let mut flattener = TreeFlattener::new(
        Manifest::new("1.0.0").with_dependency("widget", "github:acme/widget#v3"),
        manifests,
        StaticIntegrity::new(),
    );

    flattener.flatten_tree(&root).await.unwrap();
    let exported = flattener.export_entries();

    let entry = &exported["widget@github:acme/widget#v3"];
    assert_eq!(entry.version, "3.1.4");
    assert_eq!(entry.resolved.as_deref(), Some("git+https://github.com/acme/widget.git#abc123"));
}

#[tokio::test]
async fn corrupt_manifest_shasum_does_not_abort_the_tree() {
    let broken = Arc::new(installed("broken", "1.0.0", "broken").with_integrity("sha512-abc"));
    let root = Arc::new(Node::new("app", "1.0.0").with_dependency("broken", broken));

    let manifests = StaticManifests::new()
        .with("broken", "1.0.0", Manifest::new("1.0.0").with_shasum("deadbeef"));
    let root_manifest = Manifest::new("1.0.0").with_dependency("broken", "^1.0.0");
    let mut flattener = TreeFlattener::new(root_manifest, manifests, Sha1IntegrityResolver);

    flattener.flatten_tree(&root).await.unwrap();

    assert_eq!(flattener.export_entries()["broken@^1.0.0"].integrity, "sha512-abc");
}
