// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Secrets providers (spec.md §4.3 `withSecretsProviders`): a SOPS provider
//! for an encrypted file in the config root, and per-vault 1Password
//! providers chosen between an SDK-backed and a CLI-backed implementation
//! by presence of `OP_SERVICE_ACCOUNT_TOKEN`.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("failed to decrypt secrets: {0}")]
    Decrypt(String),
    #[error("secret {0} not found")]
    NotFound(String),
}

#[async_trait]
pub trait SecretsProvider: Send + Sync {
    fn init(&self) -> Result<(), SecretsError> {
        Ok(())
    }

    /// A short label identifying this provider for logging, e.g.
    /// `sops` or `op:<vault>`.
    fn name(&self) -> String;

    /// Resolve and decrypt all secrets this provider is responsible for.
    async fn load(&self) -> Result<HashMap<String, String>, SecretsError>;
}

/// Used when no secrets source is configured for a context.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSecretsProvider;

#[async_trait]
impl SecretsProvider for NoOpSecretsProvider {
    fn name(&self) -> String {
        "noop".to_string()
    }

    async fn load(&self) -> Result<HashMap<String, String>, SecretsError> {
        Ok(HashMap::new())
    }
}

/// Decrypts a SOPS-encrypted `secrets.enc.yaml`/`.yml` at a known path.
/// The actual `sops` invocation is delegated to the shell collaborator by
/// pipelines; this type only tracks which file it owns.
pub struct SopsSecretsProvider {
    encrypted_path: std::path::PathBuf,
}

impl SopsSecretsProvider {
    pub fn new(encrypted_path: std::path::PathBuf) -> Self {
        Self { encrypted_path }
    }

    pub fn encrypted_path(&self) -> &std::path::Path {
        &self.encrypted_path
    }
}

#[async_trait]
impl SecretsProvider for SopsSecretsProvider {
    fn name(&self) -> String {
        "sops".to_string()
    }

    async fn load(&self) -> Result<HashMap<String, String>, SecretsError> {
        Err(SecretsError::Decrypt(
            "sops decryption requires shell delegation".to_string(),
        ))
    }
}

/// 1Password provider bound to a single vault, dispatching through either
/// the SDK (service-account token present) or the CLI otherwise.
pub struct OnePasswordSecretsProvider {
    vault: String,
    use_sdk: bool,
}

impl OnePasswordSecretsProvider {
    /// `token` is the value of `OP_SERVICE_ACCOUNT_TOKEN`, if set.
    pub fn new(vault: impl Into<String>, token: Option<&str>) -> Self {
        Self {
            vault: vault.into(),
            use_sdk: token.is_some(),
        }
    }

    pub fn uses_sdk(&self) -> bool {
        self.use_sdk
    }
}

#[async_trait]
impl SecretsProvider for OnePasswordSecretsProvider {
    fn name(&self) -> String {
        format!("op:{}", self.vault)
    }

    async fn load(&self) -> Result<HashMap<String, String>, SecretsError> {
        Err(SecretsError::Decrypt(format!(
            "1password vault {} requires {} delegation",
            self.vault,
            if self.use_sdk { "sdk" } else { "cli" }
        )))
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeState {
        secrets: HashMap<String, String>,
        load_calls: u32,
        err: Option<String>,
    }

    #[derive(Clone, Default)]
    pub struct FakeSecretsProvider {
        name: String,
        inner: Arc<Mutex<FakeState>>,
    }

    impl FakeSecretsProvider {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                inner: Arc::default(),
            }
        }

        pub fn seed(&self, key: impl Into<String>, value: impl Into<String>) {
            self.inner.lock().secrets.insert(key.into(), value.into());
        }

        pub fn fail(&self, message: impl Into<String>) {
            self.inner.lock().err = Some(message.into());
        }

        pub fn load_calls(&self) -> u32 {
            self.inner.lock().load_calls
        }
    }

    #[async_trait]
    impl SecretsProvider for FakeSecretsProvider {
        fn name(&self) -> String {
            self.name.clone()
        }

        async fn load(&self) -> Result<HashMap<String, String>, SecretsError> {
            let mut state = self.inner.lock();
            state.load_calls += 1;
            if let Some(err) = state.err.clone() {
                return Err(SecretsError::Decrypt(err));
            }
            Ok(state.secrets.clone())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSecretsProvider;

#[cfg(test)]
#[path = "secrets_tests.rs"]
mod tests;
