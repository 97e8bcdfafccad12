// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The config handler collaborator: loads `outpost.yaml`/`.yml`, tracks the
//! selected context, and persists defaults applied during `init`
//! (spec.md §4.3, §4.6).

use indexmap::IndexMap;
use outpost_shims::Shims;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("failed to persist config: {0}")]
    Persist(String),
}

/// Typed configuration tree. Every field the wiring helpers in spec.md
/// §4.3 branch on is represented explicitly (REDESIGN FLAGS §9: a typed
/// tree replaces stringly-keyed config lookups).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub vm: VmConfig,
    #[serde(default)]
    pub docker: DockerConfig,
    #[serde(default)]
    pub dns: FeatureFlag,
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub azure: AzureConfig,
    #[serde(default)]
    pub terraform: FeatureFlag,
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VmConfig {
    pub driver: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DockerConfig {
    pub enabled: Option<bool>,
    #[serde(default)]
    pub registries: IndexMap<String, RegistryConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RegistryConfig {
    #[serde(default)]
    pub remote: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureFlag {
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GitConfig {
    #[serde(default)]
    pub livereload: FeatureFlag,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AwsConfig {
    pub enabled: Option<bool>,
    #[serde(default)]
    pub localstack: FeatureFlag,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AzureConfig {
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClusterConfig {
    pub driver: Option<String>,
    #[serde(default)]
    pub controlplanes: NodeCount,
    #[serde(default)]
    pub workers: NodeCount,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeCount {
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SecretsConfig {
    #[serde(default)]
    pub onepassword: OnePasswordConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OnePasswordConfig {
    #[serde(default)]
    pub vaults: IndexMap<String, VaultConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VaultConfig {
    #[serde(default)]
    pub url: Option<String>,
}

/// Defaults applied during `init` (spec.md §4.6 step 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultsKind {
    /// `docker-desktop` local contexts.
    Localhost,
    /// Other local contexts.
    Full,
    /// Everything else.
    Plain,
}

/// Contract for the config handler collaborator.
pub trait ConfigHandler: Send + Sync {
    fn init(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Load the base `outpost.yaml`/`.yml` at `project_root` if it exists.
    /// Absence is not an error (spec.md §4.3 step 7).
    fn load_base(&self, project_root: &Path) -> Result<(), ConfigError>;

    fn is_loaded(&self) -> bool;

    fn set_context(&self, name: &str);

    fn context(&self) -> Option<String>;

    /// Re-sync in-memory state for the selected context.
    fn load_config(&self) -> Result<(), ConfigError>;

    fn config(&self) -> Config;

    fn apply_defaults(&self, kind: DefaultsKind);

    fn apply_provider_overrides(&self, provider: &str);

    fn set_vm_driver(&self, driver: &str);

    fn set_provider(&self, provider: &str);

    fn generate_context_id(&self) -> String;

    fn context_root(&self) -> PathBuf;

    /// Persist in-memory config to disk. `has_changes` is the
    /// `hasSetFlags` hint from the parameter bag (spec.md §4.6 step 8).
    fn save_config(&self, has_changes: bool) -> Result<(), ConfigError>;
}

struct YamlConfigState {
    config: Config,
    context: Option<String>,
    loaded: bool,
    project_root: PathBuf,
}

/// Default config handler, backed by `outpost.yaml`/`.yml` under the
/// project root and a per-context directory under `contexts/<name>`.
pub struct YamlConfigHandler {
    shims: Arc<dyn Shims>,
    state: parking_lot::Mutex<YamlConfigState>,
}

impl YamlConfigHandler {
    pub fn new(shims: Arc<dyn Shims>) -> Self {
        Self {
            shims,
            state: parking_lot::Mutex::new(YamlConfigState {
                config: Config::default(),
                context: None,
                loaded: false,
                project_root: PathBuf::new(),
            }),
        }
    }

    fn base_config_path(project_root: &Path, shims: &dyn Shims) -> Option<PathBuf> {
        for name in ["outpost.yaml", "outpost.yml"] {
            let candidate = project_root.join(name);
            if shims.stat(&candidate).exists {
                return Some(candidate);
            }
        }
        None
    }
}

impl ConfigHandler for YamlConfigHandler {
    fn load_base(&self, project_root: &Path) -> Result<(), ConfigError> {
        let mut state = self.state.lock();
        state.project_root = project_root.to_path_buf();
        if let Some(path) = Self::base_config_path(project_root, self.shims.as_ref()) {
            let raw = self
                .shims
                .read_file(&path)
                .map_err(|e| ConfigError::Parse(e.to_string()))?;
            state.config =
                serde_yaml::from_slice(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
            tracing::debug!(path = %path.display(), "loaded base config");
        } else {
            tracing::debug!(root = %project_root.display(), "no base config file found");
        }
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.state.lock().loaded
    }

    fn set_context(&self, name: &str) {
        self.state.lock().context = Some(name.to_string());
    }

    fn context(&self) -> Option<String> {
        self.state.lock().context.clone()
    }

    fn load_config(&self) -> Result<(), ConfigError> {
        self.state.lock().loaded = true;
        Ok(())
    }

    fn config(&self) -> Config {
        self.state.lock().config.clone()
    }

    fn apply_defaults(&self, kind: DefaultsKind) {
        let mut state = self.state.lock();
        match kind {
            DefaultsKind::Localhost => {
                if state.config.docker.enabled.is_none() {
                    state.config.docker.enabled = Some(true);
                }
            }
            DefaultsKind::Full => {
                if state.config.docker.enabled.is_none() {
                    state.config.docker.enabled = Some(true);
                }
                if state.config.dns.enabled.is_none() {
                    state.config.dns.enabled = Some(true);
                }
            }
            DefaultsKind::Plain => {}
        }
    }

    fn apply_provider_overrides(&self, provider: &str) {
        let mut state = self.state.lock();
        match provider {
            "aws" => {
                state.config.aws.enabled = Some(true);
                state.config.cluster.driver = Some("eks".to_string());
            }
            "azure" => {
                state.config.azure.enabled = Some(true);
                state.config.cluster.driver = Some("aks".to_string());
            }
            "generic" => {
                state.config.cluster.driver = Some("talos".to_string());
            }
            _ => {}
        }
    }

    fn set_vm_driver(&self, driver: &str) {
        self.state.lock().config.vm.driver = Some(driver.to_string());
    }

    fn set_provider(&self, provider: &str) {
        self.state.lock().config.provider = Some(provider.to_string());
    }

    fn generate_context_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn context_root(&self) -> PathBuf {
        let state = self.state.lock();
        state
            .project_root
            .join("contexts")
            .join(state.context.as_deref().unwrap_or("local"))
    }

    fn save_config(&self, has_changes: bool) -> Result<(), ConfigError> {
        let state = self.state.lock();
        let path = Self::base_config_path(&state.project_root, self.shims.as_ref())
            .unwrap_or_else(|| state.project_root.join("outpost.yaml"));
        let serialized = serde_yaml::to_string(&state.config)
            .map_err(|e| ConfigError::Persist(e.to_string()))?;
        let result = self
            .shims
            .write_file(&path, serialized.as_bytes())
            .map_err(|e| ConfigError::Persist(e.to_string()));
        match &result {
            Ok(()) => tracing::info!(path = %path.display(), has_changes, "saved config"),
            Err(e) => tracing::error!(path = %path.display(), error = %e, "failed to save config"),
        }
        result
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FakeState {
        config: Config,
        context: Option<String>,
        loaded: bool,
        save_calls: Vec<bool>,
    }

    /// In-memory config handler for pipeline tests.
    #[derive(Clone, Default)]
    pub struct FakeConfigHandler {
        inner: std::sync::Arc<Mutex<FakeState>>,
    }

    impl FakeConfigHandler {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_loaded(&self, loaded: bool) {
            self.inner.lock().loaded = loaded;
        }

        pub fn seed_config(&self, config: Config) {
            self.inner.lock().config = config;
        }

        pub fn save_calls(&self) -> Vec<bool> {
            self.inner.lock().save_calls.clone()
        }
    }

    impl ConfigHandler for FakeConfigHandler {
        fn load_base(&self, _project_root: &Path) -> Result<(), ConfigError> {
            Ok(())
        }

        fn is_loaded(&self) -> bool {
            self.inner.lock().loaded
        }

        fn set_context(&self, name: &str) {
            self.inner.lock().context = Some(name.to_string());
        }

        fn context(&self) -> Option<String> {
            self.inner.lock().context.clone()
        }

        fn load_config(&self) -> Result<(), ConfigError> {
            self.inner.lock().loaded = true;
            Ok(())
        }

        fn config(&self) -> Config {
            self.inner.lock().config.clone()
        }

        fn apply_defaults(&self, _kind: DefaultsKind) {}

        fn apply_provider_overrides(&self, provider: &str) {
            let mut state = self.inner.lock();
            match provider {
                "aws" => {
                    state.config.aws.enabled = Some(true);
                    state.config.cluster.driver = Some("eks".to_string());
                }
                "azure" => {
                    state.config.azure.enabled = Some(true);
                    state.config.cluster.driver = Some("aks".to_string());
                }
                "generic" => state.config.cluster.driver = Some("talos".to_string()),
                _ => {}
            }
        }

        fn set_vm_driver(&self, driver: &str) {
            self.inner.lock().config.vm.driver = Some(driver.to_string());
        }

        fn set_provider(&self, provider: &str) {
            self.inner.lock().config.provider = Some(provider.to_string());
        }

        fn generate_context_id(&self) -> String {
            "fake-context-id".to_string()
        }

        fn context_root(&self) -> PathBuf {
            PathBuf::from("/fake/contexts/local")
        }

        fn save_config(&self, has_changes: bool) -> Result<(), ConfigError> {
            self.inner.lock().save_calls.push(has_changes);
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeConfigHandler;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
