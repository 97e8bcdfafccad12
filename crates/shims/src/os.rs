// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The default shim table, bound to real OS calls.

use crate::{ShimError, Shims, Stat};
use std::path::{Path, PathBuf};

/// Binds every shim to its real `std::fs` / `std::env` counterpart.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsShims;

impl Shims for OsShims {
    fn stat(&self, path: &Path) -> Stat {
        match std::fs::metadata(path) {
            Ok(meta) => Stat {
                exists: true,
                is_dir: meta.is_dir(),
            },
            Err(_) => Stat::ABSENT,
        }
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>, ShimError> {
        std::fs::read(path).map_err(|e| ShimError::io(path, e))
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), ShimError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ShimError::io(parent, e))?;
        }
        std::fs::write(path, data).map_err(|e| ShimError::io(path, e))
    }

    fn mkdir_all(&self, path: &Path) -> Result<(), ShimError> {
        std::fs::create_dir_all(path).map_err(|e| ShimError::io(path, e))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, ShimError> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path).map_err(|e| ShimError::io(path, e))? {
            let entry = entry.map_err(|e| ShimError::io(path, e))?;
            entries.push(entry.path());
        }
        Ok(entries)
    }

    fn remove_all(&self, path: &Path) -> Result<(), ShimError> {
        if path.is_dir() {
            std::fs::remove_dir_all(path).map_err(|e| ShimError::io(path, e))
        } else if path.exists() {
            std::fs::remove_file(path).map_err(|e| ShimError::io(path, e))
        } else {
            Ok(())
        }
    }

    fn get_env(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set_env(&self, key: &str, value: &str) {
        std::env::set_var(key, value);
    }
}
