// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn noop_manager_reports_nothing_missing() {
    let manager = NoOpToolsManager;
    assert!(manager.check().await.unwrap().is_empty());
    manager.install().await.unwrap();
}

#[tokio::test]
async fn fake_manager_reports_seeded_missing_tools() {
    let manager = FakeToolsManager::new();
    manager.set_missing(vec!["kubectl".to_string(), "talosctl".to_string()]);
    assert_eq!(
        manager.check().await.unwrap(),
        vec!["kubectl".to_string(), "talosctl".to_string()]
    );
}

#[tokio::test]
async fn fake_manager_install_clears_missing_list() {
    let manager = FakeToolsManager::new();
    manager.set_missing(vec!["kubectl".to_string()]);
    manager.install().await.unwrap();
    assert_eq!(manager.install_calls(), 1);
    assert!(manager.check().await.unwrap().is_empty());
}

#[tokio::test]
async fn fake_manager_can_simulate_install_failure() {
    let manager = FakeToolsManager::new();
    manager.fail_install("network unreachable");
    assert!(manager.install().await.is_err());
}
