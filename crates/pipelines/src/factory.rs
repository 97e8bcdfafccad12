// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PipelineFactory (spec.md §4.2): resolves a pipeline by name, building
//! and initializing it on first use, and memoizing the instance in the
//! registry so composed commands (e.g. "install after init" in one CLI
//! invocation) reuse already-initialized collaborators.

use crate::artifact::ArtifactPipeline;
use crate::base::BasePipelineHandle;
use crate::build_id::BuildIdPipeline;
use crate::check::CheckPipeline;
use crate::context::ContextPipeline;
use crate::down::DownPipeline;
use crate::env::EnvPipeline;
use crate::error::PipelineError;
use crate::exec::ExecPipeline;
use crate::hook::HookPipeline;
use crate::init::InitPipeline;
use crate::install::InstallPipeline;
use crate::pipeline::Pipeline;
use crate::up::UpPipeline;
use outpost_core::ParamBag;
use outpost_registry::Registry;
use std::path::Path;
use std::sync::Arc;

/// Looks a pipeline up by its registry name, constructing and
/// initializing it on a miss (spec.md §4.2 steps 1-2).
///
/// Memoization is keyed purely by pipeline name, not by the `ParamBag`
/// passed to `Initialize` — the second `get("envPipeline", ..., bagA)`
/// call in one process returns the instance `Initialize`d with whatever
/// bag won the race on the first call, not a fresh one for `bagA`. This
/// matches the registry's general idempotent-registration contract
/// (spec.md Invariant 1) and is why composed commands share one
/// `BasePipeline` cascade across sub-pipelines instead of re-running it.
pub struct PipelineFactory;

impl PipelineFactory {
    /// Resolve or build-and-initialize the named pipeline.
    pub fn get(
        name: &str,
        registry: &Registry,
        project_root: &Path,
        bag: &ParamBag,
    ) -> Result<Arc<dyn Pipeline>, PipelineError> {
        if let Some(existing) = registry.resolve::<Arc<dyn Pipeline>>(name) {
            return Ok(existing);
        }

        let pipeline: Arc<dyn Pipeline> = match name {
            "initPipeline" => Arc::new(InitPipeline::new()),
            "upPipeline" => Arc::new(UpPipeline::new()),
            "downPipeline" => Arc::new(DownPipeline::new()),
            "installPipeline" => Arc::new(InstallPipeline::new()),
            "envPipeline" => Arc::new(EnvPipeline::new()),
            "execPipeline" => Arc::new(ExecPipeline::new()),
            "checkPipeline" => Arc::new(CheckPipeline::new()),
            "artifactPipeline" => Arc::new(ArtifactPipeline::new()),
            "hookPipeline" => Arc::new(HookPipeline::new()),
            "buildIDPipeline" => Arc::new(BuildIdPipeline::new()),
            "contextPipeline" => Arc::new(ContextPipeline::new()),
            "basePipeline" => Arc::new(BasePipelineHandle::new()),
            other => return Err(PipelineError::UnknownPipeline(other.to_string())),
        };

        pipeline.initialize(registry, project_root, bag)?;
        Ok(registry.resolve_or_create(name, || pipeline.clone()))
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
