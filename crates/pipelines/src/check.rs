// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CheckPipeline (spec.md §4.10): `tools` and `node-health` operations.

use crate::base::{with_cluster_client, with_kubernetes_client, with_tools_manager, BasePipeline};
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use async_trait::async_trait;
use outpost_collab::{ClusterClient, KubernetesClient, ToolsManager};
use outpost_core::ParamBag;
use outpost_registry::Registry;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

struct State {
    tools_manager: Arc<dyn ToolsManager>,
    cluster_client: Arc<dyn ClusterClient>,
    kubernetes_client: Arc<dyn KubernetesClient>,
}

pub struct CheckPipeline {
    state: Mutex<Option<State>>,
}

impl CheckPipeline {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }
}

impl Default for CheckPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pipeline for CheckPipeline {
    fn initialize(
        &self,
        registry: &Registry,
        project_root: &Path,
        bag: &ParamBag,
    ) -> Result<(), PipelineError> {
        BasePipeline::initialize(registry, project_root.to_path_buf(), bag)?;
        *self.state.lock() = Some(State {
            tools_manager: with_tools_manager(registry),
            cluster_client: with_cluster_client(registry),
            kubernetes_client: with_kubernetes_client(registry),
        });
        Ok(())
    }

    async fn execute(&self, bag: &ParamBag) -> Result<(), PipelineError> {
        let (tools_manager, cluster_client, kubernetes_client) = {
            let guard = self.state.lock();
            let state = guard.as_ref().ok_or(PipelineError::NotInitialized)?;
            (
                state.tools_manager.clone(),
                state.cluster_client.clone(),
                state.kubernetes_client.clone(),
            )
        };

        let output = bag.output("output");
        let emit = |line: &str| match &output {
            Some(sink) => sink(line),
            None => println!("{line}"),
        };

        match bag.str("operation") {
            Some("node-health") => {
                let nodes = bag.seq("nodes").map(<[String]>::to_vec).unwrap_or_default();
                let k8s_requested = bag.bool("k8s-endpoint-provided");
                if nodes.is_empty() && !k8s_requested {
                    return Err(PipelineError::NoHealthChecksSpecified);
                }

                // Bounded context for the health-probe calls only
                // (spec.md §5 Cancellation and timeouts); zero means no
                // bound.
                let timeout = bag.duration("timeout");

                if !nodes.is_empty() {
                    let version = bag.str("version");
                    cluster_client
                        .wait_for_nodes_healthy(&nodes, version, timeout)
                        .await
                        .map_err(|e| PipelineError::operation("checking node health", e))?;
                    match version {
                        Some(v) => emit(&format!("Nodes healthy (version {v}).")),
                        None => emit("Nodes healthy."),
                    }
                }

                if k8s_requested {
                    let endpoint = bag.str("k8s-endpoint").unwrap_or_default();
                    kubernetes_client
                        .wait_for_kubernetes_healthy(endpoint)
                        .await
                        .map_err(|e| PipelineError::operation("checking kubernetes health", e))?;
                    emit("Kubernetes is healthy.");
                }

                Ok(())
            }
            Some("tools") | None => {
                tools_manager
                    .check()
                    .await
                    .map_err(|e| PipelineError::operation("checking tools", e))?;
                emit("All tools are up to date.");
                Ok(())
            }
            Some(other) => Err(PipelineError::UnknownMode(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
