// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! InstallPipeline (spec.md §4.9): install the loaded blueprint's
//! kustomizations into the cluster.

use crate::base::{with_blueprint_handler, with_kubernetes_manager, BasePipeline};
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use async_trait::async_trait;
use outpost_collab::{BlueprintHandler, ConfigHandler, KubernetesManager};
use outpost_core::ParamBag;
use outpost_registry::Registry;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

struct State {
    config_handler: Arc<dyn ConfigHandler>,
    blueprint_handler: Arc<dyn BlueprintHandler>,
    #[allow(dead_code)]
    kubernetes_manager: Arc<dyn KubernetesManager>,
}

pub struct InstallPipeline {
    state: Mutex<Option<State>>,
}

impl InstallPipeline {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }
}

impl Default for InstallPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pipeline for InstallPipeline {
    fn initialize(
        &self,
        registry: &Registry,
        project_root: &Path,
        bag: &ParamBag,
    ) -> Result<(), PipelineError> {
        let base = BasePipeline::initialize(registry, project_root.to_path_buf(), bag)?;
        *self.state.lock() = Some(State {
            config_handler: base.config_handler.clone(),
            blueprint_handler: with_blueprint_handler(registry),
            kubernetes_manager: with_kubernetes_manager(registry),
        });
        Ok(())
    }

    async fn execute(&self, bag: &ParamBag) -> Result<(), PipelineError> {
        let (config_handler, blueprint_handler) = {
            let guard = self.state.lock();
            let state = guard.as_ref().ok_or(PipelineError::NotInitialized)?;
            (state.config_handler.clone(), state.blueprint_handler.clone())
        };

        if !config_handler.is_loaded() {
            return Err(PipelineError::ConfigNotLoaded);
        }

        blueprint_handler
            .install()
            .await
            .map_err(|e| PipelineError::operation("installing blueprint", e))?;

        if bag.bool("wait") {
            blueprint_handler
                .wait_for_kustomizations("Waiting for kustomizations to be ready")
                .await
                .map_err(|e| PipelineError::operation("waiting for kustomizations", e))?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "install_tests.rs"]
mod tests;
