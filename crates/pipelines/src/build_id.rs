// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! BuildIDPipeline (spec.md §4.13): generates/persists the `YYMMDD.NNN.C`
//! build identifier at `<project-root>/.windsor/.build-id`.

use crate::base::BasePipeline;
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use async_trait::async_trait;
use outpost_core::{BuildId, ParamBag};
use outpost_registry::Registry;
use outpost_shims::Shims;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

struct State {
    shims: Arc<dyn Shims>,
    project_root: PathBuf,
}

pub struct BuildIdPipeline {
    state: Mutex<Option<State>>,
}

impl BuildIdPipeline {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }

    fn build_id_path(project_root: &Path) -> PathBuf {
        project_root.join(".windsor").join(".build-id")
    }
}

impl Default for BuildIdPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pipeline for BuildIdPipeline {
    fn initialize(
        &self,
        registry: &Registry,
        project_root: &Path,
        bag: &ParamBag,
    ) -> Result<(), PipelineError> {
        let base = BasePipeline::initialize(registry, project_root.to_path_buf(), bag)?;
        *self.state.lock() = Some(State {
            shims: base.shims.clone(),
            project_root: base.project_root.clone(),
        });
        Ok(())
    }

    async fn execute(&self, bag: &ParamBag) -> Result<(), PipelineError> {
        let (shims, project_root) = {
            let guard = self.state.lock();
            let state = guard.as_ref().ok_or(PipelineError::NotInitialized)?;
            (state.shims.clone(), state.project_root.clone())
        };

        let path = Self::build_id_path(&project_root);
        let force_new = bag.bool("new");

        let existing = if force_new {
            None
        } else if shims.stat(&path).exists {
            let raw = shims
                .read_file(&path)
                .map_err(|e| PipelineError::operation("reading build id", e))?;
            let raw = String::from_utf8_lossy(&raw);
            if raw.trim().is_empty() {
                None
            } else {
                Some(
                    BuildId::parse(&raw)
                        .map_err(|e| PipelineError::InvalidFormat(e.to_string()))?,
                )
            }
        } else {
            None
        };

        // Tests inject `today` directly to avoid depending on wall-clock
        // time; production callers never set this bag key.
        let today = bag
            .str("today")
            .map(str::to_string)
            .unwrap_or_else(|| chrono::Local::now().format("%y%m%d").to_string());
        let next = BuildId::next(&today, existing.as_ref());
        let rendered = next.render();

        shims
            .mkdir_all(&project_root.join(".windsor"))
            .map_err(|e| PipelineError::operation("writing build id", e))?;
        shims
            .write_file(&path, rendered.as_bytes())
            .map_err(|e| PipelineError::operation("writing build id", e))?;

        match bag.output("output") {
            Some(sink) => sink(&rendered),
            None => println!("{rendered}"),
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "build_id_tests.rs"]
mod tests;
