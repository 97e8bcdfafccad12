// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! UpPipeline (spec.md §4.7): bring the context's virtual machine,
//! container runtime, networking, and stack up, in that order.

use crate::base::{
    with_container_runtime, with_env_printers, with_networking, with_stack, with_tools_manager,
    with_virtual_machine, BasePipeline, Networking,
};
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use async_trait::async_trait;
use outpost_collab::{ContainerRuntime, NetworkManager, Stack, ToolsManager, VirtualMachine};
use outpost_core::ParamBag;
use outpost_registry::Registry;
use outpost_shims::Shims;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

struct State {
    shims: Arc<dyn Shims>,
    tools_manager: Arc<dyn ToolsManager>,
    virtual_machine: Option<Arc<dyn VirtualMachine>>,
    container_runtime: Option<Arc<dyn ContainerRuntime>>,
    network_manager: Arc<dyn NetworkManager>,
    stack: Arc<dyn Stack>,
    vm_driver_set: bool,
    docker_enabled: bool,
    dns_enabled: bool,
}

pub struct UpPipeline {
    state: Mutex<Option<State>>,
}

impl UpPipeline {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }
}

impl Default for UpPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pipeline for UpPipeline {
    fn initialize(
        &self,
        registry: &Registry,
        project_root: &Path,
        bag: &ParamBag,
    ) -> Result<(), PipelineError> {
        let base = BasePipeline::initialize(registry, project_root.to_path_buf(), bag)?;
        let config = base.config();

        let tools_manager = with_tools_manager(registry);
        let virtual_machine = with_virtual_machine(registry, &config);
        let container_runtime = with_container_runtime(registry, &config, &base.project_root);
        let Networking { manager, .. } = with_networking(registry, &config);
        let stack = with_stack(registry);
        // terraformEnv must be resolvable by the stack subsystem even when
        // terraform is disabled (spec.md §4.3 withEnvPrinters).
        with_env_printers(registry, &config, "local");

        *self.state.lock() = Some(State {
            shims: base.shims.clone(),
            tools_manager,
            virtual_machine,
            container_runtime,
            network_manager: manager,
            stack,
            vm_driver_set: config.vm.driver.as_deref() == Some("colima"),
            docker_enabled: config.docker.enabled == Some(true),
            dns_enabled: config.dns.enabled == Some(true),
        });
        Ok(())
    }

    async fn execute(&self, bag: &ParamBag) -> Result<(), PipelineError> {
        let (
            shims,
            tools_manager,
            virtual_machine,
            container_runtime,
            network_manager,
            stack,
            vm_driver_set,
            docker_enabled,
            dns_enabled,
        ) = {
            let guard = self.state.lock();
            let state = guard.as_ref().ok_or(PipelineError::NotInitialized)?;
            (
                state.shims.clone(),
                state.tools_manager.clone(),
                state.virtual_machine.clone(),
                state.container_runtime.clone(),
                state.network_manager.clone(),
                state.stack.clone(),
                state.vm_driver_set,
                state.docker_enabled,
                state.dns_enabled,
            )
        };

        let _ = bag;
        shims.set_env("NO_CACHE", "true");

        let missing = tools_manager
            .check()
            .await
            .map_err(|e| PipelineError::operation("checking tools", e))?;
        if !missing.is_empty() {
            tools_manager
                .install()
                .await
                .map_err(|e| PipelineError::operation("installing tools", e))?;
        }

        if vm_driver_set {
            let vm = virtual_machine
                .as_ref()
                .ok_or_else(|| PipelineError::Collaborator("No virtual machine found".to_string()))?;
            vm.up()
                .await
                .map_err(|e| PipelineError::operation("bringing up virtual machine", e))?;
        }

        if docker_enabled {
            let runtime = container_runtime.as_ref().ok_or_else(|| {
                PipelineError::Collaborator("No container runtime found".to_string())
            })?;
            runtime
                .up()
                .await
                .map_err(|e| PipelineError::operation("bringing up container runtime", e))?;
        }

        network_manager
            .configure()
            .map_err(|e| PipelineError::operation("configuring network", e))?;
        network_manager
            .configure_host_route()
            .map_err(|e| PipelineError::operation("configuring host route", e))?;
        if dns_enabled {
            network_manager
                .configure_dns()
                .map_err(|e| PipelineError::operation("configuring DNS", e))?;
        }

        stack
            .up()
            .await
            .map_err(|e| PipelineError::operation("bringing up stack", e))?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "up_tests.rs"]
mod tests;
