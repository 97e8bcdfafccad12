// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake shim table for testing: an in-memory filesystem and environment.

use crate::{ShimError, Shims, Stat};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Default)]
struct FakeShimsState {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: std::collections::HashSet<PathBuf>,
    env: HashMap<String, String>,
}

/// In-memory shim table. Directories created via `mkdir_all` or implied by
/// writing a file are tracked separately from file contents so `stat`
/// reports `is_dir` correctly.
#[derive(Clone, Default)]
pub struct FakeShims {
    inner: Arc<Mutex<FakeShimsState>>,
}

impl FakeShims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file's contents directly, bypassing `write_file`.
    pub fn seed_file(&self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) {
        let path = path.into();
        let mut state = self.inner.lock();
        if let Some(parent) = path.parent() {
            state.dirs.insert(parent.to_path_buf());
        }
        state.files.insert(path, data.into());
    }

    /// Seed a directory's existence without any files in it.
    pub fn seed_dir(&self, path: impl Into<PathBuf>) {
        self.inner.lock().dirs.insert(path.into());
    }

    pub fn seed_env(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.lock().env.insert(key.into(), value.into());
    }
}

impl Shims for FakeShims {
    fn stat(&self, path: &Path) -> Stat {
        let state = self.inner.lock();
        if state.files.contains_key(path) {
            Stat {
                exists: true,
                is_dir: false,
            }
        } else if state.dirs.contains(path) {
            Stat {
                exists: true,
                is_dir: true,
            }
        } else {
            Stat::ABSENT
        }
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>, ShimError> {
        self.inner
            .lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ShimError::Io {
                path: path.display().to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), ShimError> {
        let mut state = self.inner.lock();
        if let Some(parent) = path.parent() {
            state.dirs.insert(parent.to_path_buf());
        }
        state.files.insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    fn mkdir_all(&self, path: &Path) -> Result<(), ShimError> {
        self.inner.lock().dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, ShimError> {
        let state = self.inner.lock();
        let mut entries: Vec<PathBuf> = state
            .files
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        entries.extend(state.dirs.iter().filter(|p| p.parent() == Some(path)).cloned());
        Ok(entries)
    }

    fn remove_all(&self, path: &Path) -> Result<(), ShimError> {
        let mut state = self.inner.lock();
        state.files.retain(|p, _| !p.starts_with(path));
        state.dirs.retain(|p| !p.starts_with(path));
        Ok(())
    }

    fn get_env(&self, key: &str) -> Option<String> {
        self.inner.lock().env.get(key).cloned()
    }

    fn set_env(&self, key: &str, value: &str) {
        self.inner
            .lock()
            .env
            .insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
