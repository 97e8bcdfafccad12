// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DownPipeline (spec.md §4.8): inverse of Up. Stop the stack, tear down
//! networking, then stop the container runtime and VM, best-effort — every
//! step runs regardless of an earlier failure, and the first error
//! encountered is the one returned.

use crate::base::{
    with_container_runtime, with_networking, with_stack, with_virtual_machine, BasePipeline,
    Networking,
};
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use async_trait::async_trait;
use outpost_collab::{ContainerRuntime, NetworkManager, Stack, VirtualMachine};
use outpost_core::ParamBag;
use outpost_registry::Registry;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

struct State {
    virtual_machine: Option<Arc<dyn VirtualMachine>>,
    container_runtime: Option<Arc<dyn ContainerRuntime>>,
    network_manager: Arc<dyn NetworkManager>,
    stack: Arc<dyn Stack>,
    vm_driver_set: bool,
    docker_enabled: bool,
}

pub struct DownPipeline {
    state: Mutex<Option<State>>,
}

impl DownPipeline {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }
}

impl Default for DownPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pipeline for DownPipeline {
    fn initialize(
        &self,
        registry: &Registry,
        project_root: &Path,
        bag: &ParamBag,
    ) -> Result<(), PipelineError> {
        let base = BasePipeline::initialize(registry, project_root.to_path_buf(), bag)?;
        let config = base.config();

        let virtual_machine = with_virtual_machine(registry, &config);
        let container_runtime = with_container_runtime(registry, &config, &base.project_root);
        let Networking { manager, .. } = with_networking(registry, &config);
        let stack = with_stack(registry);

        *self.state.lock() = Some(State {
            virtual_machine,
            container_runtime,
            network_manager: manager,
            stack,
            vm_driver_set: config.vm.driver.as_deref() == Some("colima"),
            docker_enabled: config.docker.enabled == Some(true),
        });
        Ok(())
    }

    async fn execute(&self, _bag: &ParamBag) -> Result<(), PipelineError> {
        let (virtual_machine, container_runtime, network_manager, stack, vm_driver_set, docker_enabled) = {
            let guard = self.state.lock();
            let state = guard.as_ref().ok_or(PipelineError::NotInitialized)?;
            (
                state.virtual_machine.clone(),
                state.container_runtime.clone(),
                state.network_manager.clone(),
                state.stack.clone(),
                state.vm_driver_set,
                state.docker_enabled,
            )
        };

        let mut first_err: Option<PipelineError> = None;
        let mut record = |result: Result<(), PipelineError>, first_err: &mut Option<PipelineError>| {
            if let Err(e) = result {
                if first_err.is_none() {
                    *first_err = Some(e);
                }
            }
        };

        record(
            stack
                .down()
                .await
                .map_err(|e| PipelineError::operation("tearing down stack", e)),
            &mut first_err,
        );

        record(
            network_manager
                .teardown()
                .map_err(|e| PipelineError::operation("tearing down network", e)),
            &mut first_err,
        );

        if docker_enabled {
            match container_runtime.as_ref() {
                Some(runtime) => record(
                    runtime
                        .down()
                        .await
                        .map_err(|e| PipelineError::operation("tearing down container runtime", e)),
                    &mut first_err,
                ),
                None => record(
                    Err(PipelineError::Collaborator(
                        "No container runtime found".to_string(),
                    )),
                    &mut first_err,
                ),
            }
        }

        if vm_driver_set {
            match virtual_machine.as_ref() {
                Some(vm) => record(
                    vm.down()
                        .await
                        .map_err(|e| PipelineError::operation("tearing down virtual machine", e)),
                    &mut first_err,
                ),
                None => record(
                    Err(PipelineError::Collaborator("No virtual machine found".to_string())),
                    &mut first_err,
                ),
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "down_tests.rs"]
mod tests;
