// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ArtifactPipeline (spec.md §4.11): bundle the template/kustomize/
//! terraform outputs and either write a local bundle or push it to an OCI
//! registry.

use crate::base::{with_artifact_builder, BasePipeline};
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use async_trait::async_trait;
use outpost_collab::{ArtifactBuilder, Bundler, KustomizeBundler, TemplateBundler, TerraformBundler};
use outpost_core::ParamBag;
use outpost_registry::Registry;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

struct State {
    artifact_builder: Arc<dyn ArtifactBuilder>,
    bundlers: Vec<Box<dyn Bundler>>,
}

pub struct ArtifactPipeline {
    state: Mutex<Option<State>>,
}

impl ArtifactPipeline {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }
}

impl Default for ArtifactPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pipeline for ArtifactPipeline {
    fn initialize(
        &self,
        registry: &Registry,
        project_root: &Path,
        bag: &ParamBag,
    ) -> Result<(), PipelineError> {
        BasePipeline::initialize(registry, project_root.to_path_buf(), bag)?;
        let artifact_builder = with_artifact_builder(registry);
        let bundlers: Vec<Box<dyn Bundler>> = vec![
            Box::new(TemplateBundler),
            Box::new(KustomizeBundler),
            Box::new(TerraformBundler),
        ];

        *self.state.lock() = Some(State {
            artifact_builder,
            bundlers,
        });
        Ok(())
    }

    async fn execute(&self, bag: &ParamBag) -> Result<(), PipelineError> {
        let guard = self.state.lock();
        let state = guard.as_ref().ok_or(PipelineError::NotInitialized)?;

        for bundler in &state.bundlers {
            bundler
                .bundle(state.artifact_builder.as_ref())
                .map_err(|e| PipelineError::operation("bundling artifact", e))?;
        }

        match bag.str("artifactMode") {
            Some("bundle") => {
                let output_path = bag
                    .str("outputPath")
                    .filter(|s| !s.is_empty())
                    .ok_or(PipelineError::MissingOutputPath)?;
                let tag = bag.str("tag");
                state
                    .artifact_builder
                    .create(Path::new(output_path), tag)
                    .map_err(|e| PipelineError::operation("creating artifact", e))?;
                println!("Artifact bundled to {output_path}");
                Ok(())
            }
            Some("push") => {
                let registry_base = bag
                    .str("registryBase")
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| PipelineError::MissingParameter("registryBase".to_string()))?;
                let repo_name = bag
                    .str("repoName")
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| PipelineError::MissingParameter("repoName".to_string()))?;
                let tag = bag.str("tag");
                state
                    .artifact_builder
                    .push(registry_base, repo_name, tag)
                    .map_err(|e| PipelineError::operation("pushing artifact", e))?;
                match tag {
                    Some(tag) => println!("Artifact pushed to {registry_base}/{repo_name}:{tag}"),
                    None => println!("Artifact pushed to {registry_base}/{repo_name}"),
                }
                Ok(())
            }
            other => Err(PipelineError::UnknownMode(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
