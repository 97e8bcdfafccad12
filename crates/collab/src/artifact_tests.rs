// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn noop_builder_creates_bundle_from_accumulated_files() {
    let builder = NoOpArtifactBuilder::new();
    TemplateBundler.bundle(&builder).unwrap();
    KustomizeBundler.bundle(&builder).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("bundle.tar");
    builder.create(&out, None).unwrap();
    assert!(out.exists());
}

#[test]
fn noop_builder_push_requires_registry_destination() {
    let builder = NoOpArtifactBuilder::new();
    assert!(builder.push("", "repo", None).is_err());
    assert!(builder.push("registry.example.com", "repo", None).is_ok());
}

#[test]
fn fake_builder_records_create_and_push_calls() {
    let builder = FakeArtifactBuilder::new();
    builder.create(Path::new("/tmp/out.tar"), Some("v1")).unwrap();
    builder
        .push("registry.example.com", "infra", None)
        .unwrap();

    assert_eq!(
        builder.calls(),
        vec![
            ArtifactCall::Create {
                output_path: PathBuf::from("/tmp/out.tar"),
                tag: Some("v1".to_string()),
            },
            ArtifactCall::Push {
                registry_base: "registry.example.com".to_string(),
                repo_name: "infra".to_string(),
                tag: None,
            },
        ]
    );
}

#[test]
fn fake_builder_can_simulate_create_failure() {
    let builder = FakeArtifactBuilder::new();
    builder.fail_create("disk full");
    assert!(builder.create(Path::new("/tmp/out.tar"), None).is_err());
}
