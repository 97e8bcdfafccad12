// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The two-phase pipeline contract (spec.md §3 "Pipeline").
//!
//! A pipeline is created once by the factory, initialized exactly once, and
//! may be executed zero or more times. Every concrete pipeline stores its
//! post-initialize state behind a `parking_lot::Mutex<Option<_>>` rather than
//! requiring `&mut self`, since the factory hands pipelines out as
//! `Arc<dyn Pipeline>` shared across however many times a CLI invocation
//! chains commands in one process (spec.md §4.2 memoization rationale).

use crate::error::PipelineError;
use async_trait::async_trait;
use outpost_core::ParamBag;
use outpost_registry::Registry;
use std::path::Path;

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Wire this pipeline's collaborators through `registry` and run any
    /// one-time setup. Re-initialization is undefined (spec.md §3); callers
    /// needing a fresh instance must request one through the factory.
    fn initialize(
        &self,
        registry: &Registry,
        project_root: &Path,
        bag: &ParamBag,
    ) -> Result<(), PipelineError>;

    /// Run this pipeline's command logic. May be called more than once
    /// after a single `initialize`.
    async fn execute(&self, bag: &ParamBag) -> Result<(), PipelineError>;
}
