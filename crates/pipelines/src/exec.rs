// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ExecPipeline (spec.md §4.5): run an external command with the
//! environment populated exactly as `EnvPipeline` would populate it.

use crate::base::{
    collect_environment, determine_context_name, with_env_printers, with_secrets_providers,
    BasePipeline,
};
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use async_trait::async_trait;
use outpost_collab::{EnvPrinter, SecretsProvider, Shell};
use outpost_core::ParamBag;
use outpost_registry::Registry;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

struct State {
    shell: Arc<dyn Shell>,
    secrets_providers: Vec<Arc<dyn SecretsProvider>>,
    printers: Vec<Arc<dyn EnvPrinter>>,
}

pub struct ExecPipeline {
    state: Mutex<Option<State>>,
}

impl ExecPipeline {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }
}

impl Default for ExecPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pipeline for ExecPipeline {
    fn initialize(
        &self,
        registry: &Registry,
        project_root: &Path,
        bag: &ParamBag,
    ) -> Result<(), PipelineError> {
        let base = BasePipeline::initialize(registry, project_root.to_path_buf(), bag)?;
        let config = base.config();
        let context_name = determine_context_name(bag, base.config_handler.as_ref());
        let printers = with_env_printers(registry, &config, &context_name);
        let secrets_providers =
            with_secrets_providers(registry, &config, base.shims.as_ref(), &base.project_root);

        *self.state.lock() = Some(State {
            shell: base.shell.clone(),
            secrets_providers,
            printers,
        });
        Ok(())
    }

    async fn execute(&self, bag: &ParamBag) -> Result<(), PipelineError> {
        let (shell, secrets_providers, printers) = {
            let guard = self.state.lock();
            let state = guard.as_ref().ok_or(PipelineError::NotInitialized)?;
            (
                state.shell.clone(),
                state.secrets_providers.clone(),
                state.printers.clone(),
            )
        };

        let command = bag
            .str("command")
            .filter(|s| !s.is_empty())
            .ok_or(PipelineError::MissingCommand)?;
        let args = bag.seq("args").map(<[String]>::to_vec).unwrap_or_default();

        let decrypt = bag.bool("decrypt");
        let verbose = bag.bool("verbose");
        let env = collect_environment(&secrets_providers, &printers, decrypt, verbose).await?;

        shell
            .exec(command, &args, &env)
            .await
            .map_err(|e| PipelineError::CommandExecution(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
