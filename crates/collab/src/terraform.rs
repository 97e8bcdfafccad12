// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terraform module resolvers (spec.md §4.3 `withTerraformResolvers`):
//! a "standard" resolver for local module paths and an "OCI" resolver for
//! registry-hosted modules.

use thiserror::Error;
use std::path::PathBuf;

#[derive(Debug, Error)]
pub enum TerraformError {
    #[error("failed to resolve terraform module {0}: {1}")]
    Resolve(String, String),
}

pub trait TerraformResolver: Send + Sync {
    fn init(&self) -> Result<(), TerraformError> {
        Ok(())
    }

    /// A short discriminator ("standard" or "oci") used for logging and
    /// registry key suffixes.
    fn kind(&self) -> &'static str;

    /// Resolve `module` to a local path terraform can `-chdir` into.
    fn resolve(&self, module: &str) -> Result<PathBuf, TerraformError>;
}

/// Resolves modules that already live under the project's `terraform/`
/// directory, one subdirectory per module name.
pub struct StandardTerraformResolver {
    root: PathBuf,
}

impl StandardTerraformResolver {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl TerraformResolver for StandardTerraformResolver {
    fn kind(&self) -> &'static str {
        "standard"
    }

    fn resolve(&self, module: &str) -> Result<PathBuf, TerraformError> {
        Ok(self.root.join(module))
    }
}

/// Resolves modules published as OCI artifacts, addressed as
/// `registryBase/repoName:module`.
pub struct OciTerraformResolver {
    registry_base: String,
}

impl OciTerraformResolver {
    pub fn new(registry_base: impl Into<String>) -> Self {
        Self {
            registry_base: registry_base.into(),
        }
    }
}

impl TerraformResolver for OciTerraformResolver {
    fn kind(&self) -> &'static str {
        "oci"
    }

    fn resolve(&self, module: &str) -> Result<PathBuf, TerraformError> {
        if self.registry_base.is_empty() {
            return Err(TerraformError::Resolve(
                module.to_string(),
                "no registry base configured".to_string(),
            ));
        }
        Ok(PathBuf::from(format!(
            "{}/{}",
            self.registry_base, module
        )))
    }
}

/// No-op resolver used when `terraform.enabled=false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpTerraformResolver;

impl TerraformResolver for NoOpTerraformResolver {
    fn kind(&self) -> &'static str {
        "noop"
    }

    fn resolve(&self, module: &str) -> Result<PathBuf, TerraformError> {
        Err(TerraformError::Resolve(
            module.to_string(),
            "terraform is disabled for this context".to_string(),
        ))
    }
}

#[cfg(test)]
#[path = "terraform_tests.rs"]
mod tests;
