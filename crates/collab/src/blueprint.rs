// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The blueprint handler collaborator (spec.md §4.3 `prepareTemplateData`,
//! §4.6, §4.9, GLOSSARY "Blueprint").

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("failed to load blueprint config: {0}")]
    Load(String),
    #[error("failed to write blueprint: {0}")]
    Write(String),
    #[error("failed to install blueprint: {0}")]
    Install(String),
    #[error("timed out waiting for kustomizations: {0}")]
    WaitTimedOut(String),
}

#[async_trait]
pub trait BlueprintHandler: Send + Sync {
    fn init(&self) -> Result<(), BlueprintError> {
        Ok(())
    }

    /// Bytes of the local `contexts/_template` set, if one exists.
    fn local_template_data(&self) -> Option<Vec<u8>>;

    /// The handler's built-in defaults for the current context.
    fn default_template_data(&self) -> Vec<u8>;

    /// Load `blueprint.yaml` from the config root into memory.
    fn load_config(&self) -> Result<(), BlueprintError>;

    /// Load blueprint contents from explicit template bytes (used when
    /// `reset=true` or no `blueprint.yaml` exists yet).
    fn load_from_template(&self, data: &[u8]) -> Result<(), BlueprintError>;

    /// Whether the currently loaded blueprint was sourced locally (as
    /// opposed to an OCI pull).
    fn is_local(&self) -> bool;

    /// OCI sources referenced by the loaded blueprint, to be pulled
    /// through the artifact builder when the blueprint is not local.
    fn oci_sources(&self) -> Vec<String>;

    /// Persist the in-memory blueprint to `blueprint.yaml`.
    fn write(&self, reset: bool) -> Result<(), BlueprintError>;

    async fn install(&self) -> Result<(), BlueprintError>;

    async fn wait_for_kustomizations(&self, message: &str) -> Result<(), BlueprintError>;
}

/// Minimal real implementation: treats `contexts/_template` presence as
/// the sole source of local data and otherwise no-ops. Sufficient to wire
/// the pipeline layer end-to-end without a real blueprint renderer.
pub struct LocalBlueprintHandler {
    local_data: parking_lot::Mutex<Option<Vec<u8>>>,
}

impl LocalBlueprintHandler {
    pub fn new() -> Self {
        Self {
            local_data: parking_lot::Mutex::new(None),
        }
    }

    pub fn with_local_template(data: Vec<u8>) -> Self {
        Self {
            local_data: parking_lot::Mutex::new(Some(data)),
        }
    }
}

impl Default for LocalBlueprintHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlueprintHandler for LocalBlueprintHandler {
    fn local_template_data(&self) -> Option<Vec<u8>> {
        self.local_data.lock().clone()
    }

    fn default_template_data(&self) -> Vec<u8> {
        b"kind: Blueprint\n".to_vec()
    }

    fn load_config(&self) -> Result<(), BlueprintError> {
        Ok(())
    }

    fn load_from_template(&self, data: &[u8]) -> Result<(), BlueprintError> {
        *self.local_data.lock() = Some(data.to_vec());
        Ok(())
    }

    fn is_local(&self) -> bool {
        self.local_data.lock().is_some()
    }

    fn oci_sources(&self) -> Vec<String> {
        Vec::new()
    }

    fn write(&self, _reset: bool) -> Result<(), BlueprintError> {
        Ok(())
    }

    async fn install(&self) -> Result<(), BlueprintError> {
        Ok(())
    }

    async fn wait_for_kustomizations(&self, _message: &str) -> Result<(), BlueprintError> {
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FakeState {
        local_data: Option<Vec<u8>>,
        loaded: bool,
        written: Vec<bool>,
        install_calls: u32,
        install_err: Option<String>,
        wait_calls: Vec<String>,
    }

    #[derive(Clone, Default)]
    pub struct FakeBlueprintHandler {
        inner: std::sync::Arc<Mutex<FakeState>>,
    }

    impl FakeBlueprintHandler {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_local_template(&self, data: Vec<u8>) {
            self.inner.lock().local_data = Some(data);
        }

        pub fn fail_install(&self, message: impl Into<String>) {
            self.inner.lock().install_err = Some(message.into());
        }

        pub fn install_calls(&self) -> u32 {
            self.inner.lock().install_calls
        }

        pub fn write_calls(&self) -> Vec<bool> {
            self.inner.lock().written.clone()
        }

        pub fn wait_calls(&self) -> Vec<String> {
            self.inner.lock().wait_calls.clone()
        }
    }

    #[async_trait]
    impl BlueprintHandler for FakeBlueprintHandler {
        fn local_template_data(&self) -> Option<Vec<u8>> {
            self.inner.lock().local_data.clone()
        }

        fn default_template_data(&self) -> Vec<u8> {
            b"kind: Blueprint\n".to_vec()
        }

        fn load_config(&self) -> Result<(), BlueprintError> {
            self.inner.lock().loaded = true;
            Ok(())
        }

        fn load_from_template(&self, data: &[u8]) -> Result<(), BlueprintError> {
            self.inner.lock().local_data = Some(data.to_vec());
            Ok(())
        }

        fn is_local(&self) -> bool {
            self.inner.lock().local_data.is_some()
        }

        fn oci_sources(&self) -> Vec<String> {
            Vec::new()
        }

        fn write(&self, reset: bool) -> Result<(), BlueprintError> {
            self.inner.lock().written.push(reset);
            Ok(())
        }

        async fn install(&self) -> Result<(), BlueprintError> {
            let mut state = self.inner.lock();
            state.install_calls += 1;
            if let Some(err) = state.install_err.clone() {
                return Err(BlueprintError::Install(err));
            }
            Ok(())
        }

        async fn wait_for_kustomizations(&self, message: &str) -> Result<(), BlueprintError> {
            self.inner.lock().wait_calls.push(message.to_string());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeBlueprintHandler;

#[cfg(test)]
#[path = "blueprint_tests.rs"]
mod tests;
