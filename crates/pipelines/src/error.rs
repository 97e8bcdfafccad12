// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pipeline-layer error taxonomy (spec.md §7 failure model).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A subsystem's `Initialize` failed (spec.md §7 "Wiring error").
    #[error("failed to initialize {component}: {source}")]
    Wiring { component: String, source: String },

    /// A delegated Execute-phase call failed (spec.md §7 "Operation
    /// failure", e.g. `Error installing blueprint: <underlying>`).
    #[error("Error {action}: {source}")]
    Operation { action: String, source: String },

    #[error("Nothing to install. Have you run outpost init?")]
    ConfigNotLoaded,

    #[error("missing-output-path")]
    MissingOutputPath,

    #[error("unknown-mode: {0}")]
    UnknownMode(String),

    #[error("missing-command")]
    MissingCommand,

    /// spec.md §8 Scenario #1: the message must contain both
    /// "failed to load secrets" and the underlying cause.
    #[error("failed to load secrets: {0}")]
    SecretsLoad(String),

    #[error("command-execution: {0}")]
    CommandExecution(String),

    #[error("invalid-format: {0}")]
    InvalidFormat(String),

    #[error("{0}")]
    Collaborator(String),

    #[error("unknown pipeline: {0}")]
    UnknownPipeline(String),

    #[error("pipeline executed before initialize")]
    NotInitialized,

    #[error("No health checks specified. Provide --node or use --k8s-endpoint.")]
    NoHealthChecksSpecified,

    #[error("missing parameter: {0}")]
    MissingParameter(String),

    #[error("Run outpost init first.")]
    ContextNotLoaded,
}

impl PipelineError {
    /// Wiring error (spec.md §7): a subsystem's `Initialize` failed.
    /// `component` is the registry key / subsystem name.
    pub fn wiring(component: impl Into<String>, source: impl std::fmt::Display) -> Self {
        PipelineError::Wiring {
            component: component.into(),
            source: source.to_string(),
        }
    }

    /// Operation failure (spec.md §7): a delegated Execute-phase call
    /// failed. `action` is a present-participle phrase, e.g.
    /// `"installing blueprint"`.
    pub fn operation(action: impl Into<String>, source: impl std::fmt::Display) -> Self {
        PipelineError::Operation {
            action: action.into(),
            source: source.to_string(),
        }
    }
}
