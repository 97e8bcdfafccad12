// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File generators run during `InitPipeline`/`UpPipeline` template
//! preparation (spec.md §4.3 `withGenerators`): the git generator always
//! runs; the terraform generator runs only when terraform is enabled.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generator {0} failed: {1}")]
    Failed(String, String),
}

pub trait Generator: Send + Sync {
    fn init(&self) -> Result<(), GeneratorError> {
        Ok(())
    }

    fn name(&self) -> &'static str;

    /// Produce `relative path -> file contents` for everything this
    /// generator contributes to the rendered context tree.
    fn generate(&self, template_data: &HashMap<String, String>) -> Result<HashMap<String, Vec<u8>>, GeneratorError>;
}

/// Writes `.gitignore` and a `.git/info/exclude` entry for generated
/// context artifacts.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitGenerator;

impl Generator for GitGenerator {
    fn name(&self) -> &'static str {
        "git"
    }

    fn generate(&self, _template_data: &HashMap<String, String>) -> Result<HashMap<String, Vec<u8>>, GeneratorError> {
        let mut files = HashMap::new();
        files.insert(
            ".gitignore".to_string(),
            b".terraform/\n*.tfstate\n*.tfstate.backup\n".to_vec(),
        );
        Ok(files)
    }
}

/// Writes the `main.tf`/`variables.tf` skeleton for a context's terraform
/// module, keyed from template data under `terraform.*`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerraformGenerator;

impl Generator for TerraformGenerator {
    fn name(&self) -> &'static str {
        "terraform"
    }

    fn generate(&self, template_data: &HashMap<String, String>) -> Result<HashMap<String, Vec<u8>>, GeneratorError> {
        let module = template_data
            .get("terraform.module")
            .cloned()
            .unwrap_or_else(|| "main".to_string());
        let mut files = HashMap::new();
        files.insert(
            "terraform/main.tf".to_string(),
            format!("module \"{module}\" {{\n  source = \"./modules/{module}\"\n}}\n").into_bytes(),
        );
        Ok(files)
    }
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;
