// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tools manager collaborator: verifies and installs the external
//! binaries a context's providers depend on (spec.md §4.3 `withToolsManager`,
//! §4.9 CheckPipeline, §4.10 InstallPipeline).

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolsError {
    #[error("tool check failed: {0}")]
    Check(String),
    #[error("tool install failed: {0}")]
    Install(String),
}

#[async_trait]
pub trait ToolsManager: Send + Sync {
    fn init(&self) -> Result<(), ToolsError> {
        Ok(())
    }

    /// Names of tools this manager expects to find on `PATH` but did not.
    async fn check(&self) -> Result<Vec<String>, ToolsError>;

    /// Attempt to install whatever `check` reported missing.
    async fn install(&self) -> Result<(), ToolsError>;

    /// Write the tools manifest under the project root (spec.md §4.6 Init
    /// Execute step 7).
    fn write_manifest(&self, _project_root: &std::path::Path) -> Result<(), ToolsError> {
        Ok(())
    }
}

/// No-op manager used by contexts that declare no required tooling.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpToolsManager;

#[async_trait]
impl ToolsManager for NoOpToolsManager {
    async fn check(&self) -> Result<Vec<String>, ToolsError> {
        Ok(Vec::new())
    }

    async fn install(&self) -> Result<(), ToolsError> {
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeState {
        missing: Vec<String>,
        install_calls: u32,
        install_err: Option<String>,
    }

    #[derive(Clone, Default)]
    pub struct FakeToolsManager {
        inner: Arc<Mutex<FakeState>>,
    }

    impl FakeToolsManager {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_missing(&self, tools: Vec<String>) {
            self.inner.lock().missing = tools;
        }

        pub fn fail_install(&self, message: impl Into<String>) {
            self.inner.lock().install_err = Some(message.into());
        }

        pub fn install_calls(&self) -> u32 {
            self.inner.lock().install_calls
        }
    }

    #[async_trait]
    impl ToolsManager for FakeToolsManager {
        async fn check(&self) -> Result<Vec<String>, ToolsError> {
            Ok(self.inner.lock().missing.clone())
        }

        async fn install(&self) -> Result<(), ToolsError> {
            let mut state = self.inner.lock();
            state.install_calls += 1;
            if let Some(err) = state.install_err.clone() {
                return Err(ToolsError::Install(err));
            }
            state.missing.clear();
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeToolsManager;

#[cfg(test)]
#[path = "tools_tests.rs"]
mod tests;
