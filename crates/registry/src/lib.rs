// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The DI registry (spec.md §4.1): a process-scoped string -> component map.
//!
//! `register` is idempotent from the caller's viewpoint: the first value
//! registered under a key is kept for the registry's lifetime, and later
//! registrations under the same key are silently ignored (the caller gets
//! back the value that actually won, so resolve-or-create code reads
//! naturally). `resolve` never panics; a miss is `None`.

use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Process-scoped component registry, shared across every pipeline run in
/// one CLI invocation (and, for composed commands, across more than one
/// pipeline).
#[derive(Default)]
pub struct Registry {
    entries: Mutex<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` under `name` if nothing is registered there yet.
    /// Returns the value now bound to `name` — either the one just passed,
    /// or the pre-existing one if another caller won the race. `T` is
    /// typically itself a cheap handle (`Arc<dyn Trait>`), since that is
    /// what every wiring helper in `outpost-pipelines` registers.
    ///
    /// Panics only if an existing entry under `name` cannot be downcast to
    /// `T`, which indicates two collaborator kinds sharing one key name —
    /// a wiring bug, not a runtime condition callers should handle.
    pub fn register<T: Clone + Send + Sync + 'static>(&self, name: &str, value: T) -> T {
        let mut entries = self.entries.lock();
        let entry = entries
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(value.clone()) as Arc<dyn Any + Send + Sync>);
        Arc::clone(entry)
            .downcast::<T>()
            .map(|arc| (*arc).clone())
            .unwrap_or_else(|_| panic!("registry key '{name}' reused for a different type"))
    }

    /// Resolve a previously registered value, or `None` on a miss.
    pub fn resolve<T: Clone + Send + Sync + 'static>(&self, name: &str) -> Option<T> {
        let entries = self.entries.lock();
        entries
            .get(name)
            .and_then(|v| v.clone().downcast::<T>().ok())
            .map(|arc| (*arc).clone())
    }

    /// The "resolve-or-create-and-register" idiom used throughout
    /// `BasePipeline`'s wiring helpers (spec.md §4.1 rationale): resolve an
    /// existing entry, or construct one with `ctor` and register it. The
    /// constructor only runs on a miss.
    pub fn resolve_or_create<T, F>(&self, name: &str, ctor: F) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        if let Some(existing) = self.resolve::<T>(name) {
            return existing;
        }
        self.register(name, ctor())
    }

    /// Whether any value (of any type) is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.lock().contains_key(name)
    }

    /// Number of distinct keys currently registered. Used by tests that
    /// assert `Execute` preserves the registry keyset (spec.md §8,
    /// Testable Property 3).
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
