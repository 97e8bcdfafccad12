// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The shim table: a swappable indirection over filesystem and environment
//! syscalls (spec.md §3 "Shim Table"). Every pipeline holds exactly one
//! `Arc<dyn Shims>`; the default binds real OS calls, tests substitute
//! `FakeShims`.

mod os;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use os::OsShims;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeShims;

use std::path::Path;
use thiserror::Error;

/// Errors from shim operations. These are thin wrappers over `io::Error`
/// kept separate so collaborator/pipeline code never needs to name
/// `std::io::Error` directly.
#[derive(Debug, Error)]
pub enum ShimError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ShimError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        ShimError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result of `Shims::stat`. Kept intentionally narrow: pipelines only ever
/// ask "does this exist" and "is it a directory".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub exists: bool,
    pub is_dir: bool,
}

impl Stat {
    pub const ABSENT: Stat = Stat {
        exists: false,
        is_dir: false,
    };
}

/// The shim table contract. All methods are synchronous: every call here
/// is expected to complete promptly (local filesystem, process environment)
/// and pipelines never need to await it.
pub trait Shims: Send + Sync {
    fn stat(&self, path: &Path) -> Stat;
    fn read_file(&self, path: &Path) -> Result<Vec<u8>, ShimError>;
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), ShimError>;
    fn mkdir_all(&self, path: &Path) -> Result<(), ShimError>;
    fn read_dir(&self, path: &Path) -> Result<Vec<std::path::PathBuf>, ShimError>;
    fn remove_all(&self, path: &Path) -> Result<(), ShimError>;
    fn get_env(&self, key: &str) -> Option<String>;
    fn set_env(&self, key: &str, value: &str);
}
