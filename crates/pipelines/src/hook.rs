// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HookPipeline (spec.md §4.12): installs the shell-integration hook.

use crate::base::BasePipeline;
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use async_trait::async_trait;
use outpost_core::ParamBag;
use outpost_registry::Registry;
use parking_lot::Mutex;
use std::path::Path;

pub struct HookPipeline {
    base: Mutex<Option<BasePipeline>>,
}

impl HookPipeline {
    pub fn new() -> Self {
        Self {
            base: Mutex::new(None),
        }
    }
}

impl Default for HookPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pipeline for HookPipeline {
    fn initialize(
        &self,
        registry: &Registry,
        project_root: &Path,
        bag: &ParamBag,
    ) -> Result<(), PipelineError> {
        let base = BasePipeline::initialize(registry, project_root.to_path_buf(), bag)?;
        *self.base.lock() = Some(base);
        Ok(())
    }

    async fn execute(&self, bag: &ParamBag) -> Result<(), PipelineError> {
        let shell = self
            .base
            .lock()
            .as_ref()
            .map(|b| b.shell.clone())
            .ok_or(PipelineError::NotInitialized)?;

        let shell_type = bag
            .str("shellType")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PipelineError::MissingParameter("shellType".to_string()))?;

        shell
            .install_hook(shell_type)
            .map_err(|e| PipelineError::operation("installing shell hook", e))
    }
}

#[cfg(test)]
#[path = "hook_tests.rs"]
mod tests;
