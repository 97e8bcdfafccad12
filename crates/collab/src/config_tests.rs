// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use outpost_shims::OsShims;

#[test]
fn load_base_absence_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let handler = YamlConfigHandler::new(Arc::new(OsShims));
    assert!(handler.load_base(dir.path()).is_ok());
    assert_eq!(handler.config(), Config::default());
}

#[test]
fn load_base_parses_existing_yaml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("outpost.yaml"),
        "vm:\n  driver: colima\ndocker:\n  enabled: true\n",
    )
    .unwrap();
    let handler = YamlConfigHandler::new(Arc::new(OsShims));
    handler.load_base(dir.path()).unwrap();
    let config = handler.config();
    assert_eq!(config.vm.driver.as_deref(), Some("colima"));
    assert_eq!(config.docker.enabled, Some(true));
}

#[test]
fn apply_provider_overrides_sets_cluster_driver() {
    let handler = YamlConfigHandler::new(Arc::new(OsShims));
    handler.apply_provider_overrides("aws");
    assert_eq!(handler.config().cluster.driver.as_deref(), Some("eks"));
    assert_eq!(handler.config().aws.enabled, Some(true));

    handler.apply_provider_overrides("generic");
    assert_eq!(handler.config().cluster.driver.as_deref(), Some("talos"));
}

#[test]
fn save_config_round_trips_through_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let handler = YamlConfigHandler::new(Arc::new(OsShims));
    handler.load_base(dir.path()).unwrap();
    handler.set_vm_driver("docker-desktop");
    handler.save_config(true).unwrap();

    let reloaded = YamlConfigHandler::new(Arc::new(OsShims));
    reloaded.load_base(dir.path()).unwrap();
    assert_eq!(
        reloaded.config().vm.driver.as_deref(),
        Some("docker-desktop")
    );
}

#[test]
fn generate_context_id_is_non_empty() {
    let handler = YamlConfigHandler::new(Arc::new(OsShims));
    assert!(!handler.generate_context_id().is_empty());
}
