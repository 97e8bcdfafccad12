// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ContextPipeline (spec.md §4.14): get/set the active Windsor context.

use crate::base::BasePipeline;
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use async_trait::async_trait;
use outpost_collab::{ConfigHandler, Shell};
use outpost_core::ParamBag;
use outpost_registry::Registry;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

struct State {
    shell: Arc<dyn Shell>,
    config_handler: Arc<dyn ConfigHandler>,
}

pub struct ContextPipeline {
    state: Mutex<Option<State>>,
}

impl ContextPipeline {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }
}

impl Default for ContextPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pipeline for ContextPipeline {
    fn initialize(
        &self,
        registry: &Registry,
        project_root: &Path,
        bag: &ParamBag,
    ) -> Result<(), PipelineError> {
        let base = BasePipeline::initialize(registry, project_root.to_path_buf(), bag)?;
        *self.state.lock() = Some(State {
            shell: base.shell.clone(),
            config_handler: base.config_handler.clone(),
        });
        Ok(())
    }

    async fn execute(&self, bag: &ParamBag) -> Result<(), PipelineError> {
        let (shell, config_handler) = {
            let guard = self.state.lock();
            let state = guard.as_ref().ok_or(PipelineError::NotInitialized)?;
            (state.shell.clone(), state.config_handler.clone())
        };

        let output = bag.output("output");
        let emit = |line: &str| match &output {
            Some(sink) => sink(line),
            None => println!("{line}"),
        };

        match bag.str("operation") {
            Some("get") | None => {
                if !config_handler.is_loaded() {
                    return Err(PipelineError::ContextNotLoaded);
                }
                let current = config_handler.context().unwrap_or_else(|| "local".to_string());
                emit(&current);
                Ok(())
            }
            Some("set") => {
                let name = bag
                    .str("contextName")
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| PipelineError::MissingParameter("contextName".to_string()))?;
                if !config_handler.is_loaded() {
                    return Err(PipelineError::ContextNotLoaded);
                }
                shell
                    .write_reset_token()
                    .map_err(|e| PipelineError::operation("writing reset token", e))?;
                config_handler.set_context(name);
                emit(&format!("Context set to: {name}"));
                Ok(())
            }
            Some(other) => Err(PipelineError::UnknownMode(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
