// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! EnvPipeline (spec.md §4.4): compute the full environment-variable set
//! for the active context, optionally decrypt secrets, and either inject
//! into the current process (quiet) or print in the shell-appropriate
//! format (non-quiet).

use crate::base::{
    collect_environment, determine_context_name, handle_session_reset, with_env_printers,
    with_secrets_providers, BasePipeline,
};
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use async_trait::async_trait;
use outpost_collab::{EnvPrinter, SecretsProvider, Shell};
use outpost_core::ParamBag;
use outpost_registry::Registry;
use outpost_shims::Shims;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

struct State {
    shell: Arc<dyn Shell>,
    shims: Arc<dyn Shims>,
    secrets_providers: Vec<Arc<dyn SecretsProvider>>,
    printers: Vec<Arc<dyn EnvPrinter>>,
    project_root: PathBuf,
}

pub struct EnvPipeline {
    state: Mutex<Option<State>>,
}

impl EnvPipeline {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }
}

impl Default for EnvPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Matches `outpost_cli::color::yellow` (ANSI 33) without that crate's TTY
/// detection, since this warning always goes to a non-interactive pipe
/// when invoked through shell-hook integration.
fn warn_untrusted(shims: &dyn Shims, text: &str) {
    if shims.get_env("NO_COLOR").as_deref() == Some("1") {
        eprintln!("{text}");
    } else {
        eprintln!("\x1b[33m{text}\x1b[0m");
    }
}

#[async_trait]
impl Pipeline for EnvPipeline {
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
            shims: base.shims.clone(),
            secrets_providers,
            printers,
            project_root: base.project_root.clone(),
        });
        Ok(())
    }

    async fn execute(&self, bag: &ParamBag) -> Result<(), PipelineError> {
        let (shell, shims, secrets_providers, printers, project_root) = {
            let guard = self.state.lock();
            let state = guard.as_ref().ok_or(PipelineError::NotInitialized)?;
            (
                state.shell.clone(),
                state.shims.clone(),
                state.secrets_providers.clone(),
                state.printers.clone(),
                state.project_root.clone(),
            )
        };

        let quiet = bag.bool("quiet");
        let hook = bag.bool("hook");
        let decrypt = bag.bool("decrypt");
        let verbose = bag.bool("verbose");

        if !shell.is_trusted(&project_root) {
            shell
                .reset(quiet)
                .map_err(|e| PipelineError::operation("resetting session", e))?;
            if !hook {
                warn_untrusted(
                    shims.as_ref(),
                    "outpost: directory is not trusted. Run `outpost init` here first.",
                );
            }
            return Ok(());
        }

        handle_session_reset(shell.as_ref(), shims.as_ref(), quiet)?;

        let vars = collect_environment(&secrets_providers, &printers, decrypt, verbose).await?;

        for (key, value) in &vars {
            shims.set_env(key, value);
        }

        // Injection is irreversible once we start printing (spec.md §9
        // Design Notes open question: "inject first, print second" means a
        // crash mid-print still leaves variables injected). Log here so
        // that window is at least observable in debug output.
        tracing::debug!(count = vars.len(), "injected environment variables before printing");

        if !quiet {
            shell.print_env(&vars);

            let mut first_err = None;
            for printer in &printers {
                if let Err(e) = printer.post_env_hook() {
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
            if let Some(e) = first_err {
                if verbose {
                    return Err(PipelineError::operation("running post-env hook", e));
                }
                tracing::debug!(error = %e, "swallowed post-env-hook failure in non-verbose mode");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
