// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn resolve_misses_on_empty_registry() {
    let registry = Registry::new();
    assert_eq!(registry.resolve::<String>("shell"), None);
}

#[test]
fn register_then_resolve_round_trips() {
    let registry = Registry::new();
    registry.register("shell", "real-shell".to_string());
    assert_eq!(
        registry.resolve::<String>("shell"),
        Some("real-shell".to_string())
    );
}

#[test]
fn first_registration_wins() {
    let registry = Registry::new();
    registry.register("shell", 1_u32);
    let won = registry.register("shell", 2_u32);
    assert_eq!(won, 1);
    assert_eq!(registry.resolve::<u32>("shell"), Some(1));
}

#[test]
fn resolve_or_create_only_constructs_on_miss() {
    let registry = Registry::new();
    let calls = std::sync::atomic::AtomicUsize::new(0);

    let first = registry.resolve_or_create("shims", || {
        calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        42_u32
    });
    let second = registry.resolve_or_create("shims", || {
        calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        99_u32
    });

    assert_eq!(first, 42);
    assert_eq!(second, 42);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[test]
fn contains_reflects_registration() {
    let registry = Registry::new();
    assert!(!registry.contains("configHandler"));
    registry.register("configHandler", ());
    assert!(registry.contains("configHandler"));
}

#[test]
fn len_tracks_distinct_keys() {
    let registry = Registry::new();
    assert_eq!(registry.len(), 0);
    registry.register("shell", ());
    registry.register("configHandler", ());
    registry.register("configHandler", ()); // same key, no growth
    assert_eq!(registry.len(), 2);
}

#[test]
#[should_panic(expected = "reused for a different type")]
fn type_confusion_on_shared_key_panics() {
    let registry = Registry::new();
    registry.register("shell", 1_u32);
    let _: Option<String> = registry.resolve("shell"); // fine, just a miss-by-type
    registry.register("shell", "oops".to_string());
}
