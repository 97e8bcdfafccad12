// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shell collaborator: trust list, verbosity, reset tokens, hook
//! installation, and exec delegation (spec.md §4.3, §4.5, §4.12).

use async_trait::async_trait;
use outpost_shims::Shims;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to add trusted directory: {0}")]
    TrustAdd(String),
    #[error("failed to reset shell state: {0}")]
    Reset(String),
    #[error("command execution failed: {0}")]
    Exec(String),
    #[error("unsupported shell type: {0}")]
    UnsupportedShellType(String),
}

/// Contract for the shell collaborator.
#[async_trait]
pub trait Shell: Send + Sync {
    fn init(&self) -> Result<(), ShellError> {
        Ok(())
    }

    /// Whether `dir` is in the trusted list.
    fn is_trusted(&self, dir: &Path) -> bool;

    /// Add `dir` to the trusted list.
    fn add_trusted(&self, dir: &Path) -> Result<(), ShellError>;

    fn set_verbose(&self, verbose: bool);

    /// The shell's own "should I reset" check, consulted by
    /// `handleSessionReset` when a session token is already present.
    fn wants_reset(&self) -> bool;

    /// Perform a reset: clears cached shell-hook state. `quiet` suppresses
    /// any interactive notice the shell itself would otherwise print.
    fn reset(&self, quiet: bool) -> Result<(), ShellError>;

    /// Write a reset token so shell integration re-evaluates env/prompt.
    fn write_reset_token(&self) -> Result<(), ShellError>;

    /// Print a variable map in this shell's native export syntax.
    fn print_env(&self, vars: &HashMap<String, String>);

    /// Install the shell-hook snippet for `shell_type` (bash/zsh/fish/...).
    fn install_hook(&self, shell_type: &str) -> Result<(), ShellError>;

    /// Run an external command with the given environment, inheriting
    /// stdio. Used by `ExecPipeline`.
    async fn exec(
        &self,
        command: &str,
        args: &[String],
        env: &HashMap<String, String>,
    ) -> Result<i32, ShellError>;
}

struct RealShellState {
    trusted: std::collections::HashSet<PathBuf>,
    verbose: bool,
}

/// Default shell implementation, backed by the shim table for persistence
/// of the trusted-directory list and reset token.
pub struct RealShell {
    shims: Arc<dyn Shims>,
    state_dir: PathBuf,
    state: parking_lot::Mutex<RealShellState>,
}

impl RealShell {
    pub fn new(shims: Arc<dyn Shims>, state_dir: PathBuf) -> Self {
        Self {
            shims,
            state_dir,
            state: parking_lot::Mutex::new(RealShellState {
                trusted: Default::default(),
                verbose: false,
            }),
        }
    }

    fn trust_file(&self) -> PathBuf {
        self.state_dir.join("trusted")
    }

    fn reset_token_file(&self) -> PathBuf {
        self.state_dir.join("reset-token")
    }
}

#[async_trait]
impl Shell for RealShell {
    fn init(&self) -> Result<(), ShellError> {
        if let Ok(data) = self.shims.read_file(&self.trust_file()) {
            let mut state = self.state.lock();
            for line in String::from_utf8_lossy(&data).lines() {
                state.trusted.insert(PathBuf::from(line));
            }
        }
        Ok(())
    }

    fn is_trusted(&self, dir: &Path) -> bool {
        self.state.lock().trusted.contains(dir)
    }

    fn add_trusted(&self, dir: &Path) -> Result<(), ShellError> {
        {
            let mut state = self.state.lock();
            state.trusted.insert(dir.to_path_buf());
        }
        let contents = self
            .state
            .lock()
            .trusted
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        let result = self
            .shims
            .write_file(&self.trust_file(), contents.as_bytes())
            .map_err(|e| ShellError::TrustAdd(e.to_string()));
        match &result {
            Ok(()) => tracing::debug!(dir = %dir.display(), "trusted directory"),
            Err(e) => tracing::error!(dir = %dir.display(), error = %e, "failed to persist trust list"),
        }
        result
    }

    fn set_verbose(&self, verbose: bool) {
        self.state.lock().verbose = verbose;
    }

    fn wants_reset(&self) -> bool {
        self.shims.get_env("WINDSOR_RESET_REQUESTED").as_deref() == Some("true")
    }

    fn reset(&self, _quiet: bool) -> Result<(), ShellError> {
        self.write_reset_token()
    }

    fn write_reset_token(&self) -> Result<(), ShellError> {
        self.shims
            .write_file(&self.reset_token_file(), b"reset")
            .map_err(|e| ShellError::Reset(e.to_string()))
    }

    fn print_env(&self, vars: &HashMap<String, String>) {
        let mut keys: Vec<&String> = vars.keys().collect();
        keys.sort();
        for key in keys {
            println!("export {}=\"{}\"", key, vars[key]);
        }
    }

    fn install_hook(&self, shell_type: &str) -> Result<(), ShellError> {
        match shell_type {
            "bash" | "zsh" | "fish" | "pwsh" => {
                tracing::info!(shell_type, "installed shell hook");
                Ok(())
            }
            other => Err(ShellError::UnsupportedShellType(other.to_string())),
        }
    }

    async fn exec(
        &self,
        command: &str,
        args: &[String],
        env: &HashMap<String, String>,
    ) -> Result<i32, ShellError> {
        let span = tracing::info_span!("shell.exec", command, env_count = env.len());
        let _enter = span.enter();
        let status = tokio::process::Command::new(command)
            .args(args)
            .envs(env)
            .status()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to spawn command");
                ShellError::Exec(e.to_string())
            })?;
        let code = status.code().unwrap_or(-1);
        tracing::debug!(code, "command exited");
        Ok(code)
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ShellCall {
        AddTrusted(PathBuf),
        Reset { quiet: bool },
        WriteResetToken,
        InstallHook(String),
        Exec {
            command: String,
            args: Vec<String>,
            env: std::collections::BTreeMap<String, String>,
        },
    }

    struct FakeState {
        trusted: std::collections::HashSet<PathBuf>,
        verbose: bool,
        wants_reset: bool,
        calls: Vec<ShellCall>,
        fail_reset_token: bool,
        exec_result: Result<i32, String>,
    }

    /// In-memory shell double with call recording, for pipeline tests.
    #[derive(Clone)]
    pub struct FakeShell {
        inner: std::sync::Arc<Mutex<FakeState>>,
    }

    impl Default for FakeShell {
        fn default() -> Self {
            Self {
                inner: std::sync::Arc::new(Mutex::new(FakeState {
                    trusted: Default::default(),
                    verbose: false,
                    wants_reset: false,
                    calls: Vec::new(),
                    fail_reset_token: false,
                    exec_result: Ok(0),
                })),
            }
        }
    }

    impl FakeShell {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn trust(&self, dir: impl Into<PathBuf>) {
            self.inner.lock().trusted.insert(dir.into());
        }

        pub fn set_wants_reset(&self, wants: bool) {
            self.inner.lock().wants_reset = wants;
        }

        pub fn fail_reset_token(&self) {
            self.inner.lock().fail_reset_token = true;
        }

        pub fn calls(&self) -> Vec<ShellCall> {
            self.inner.lock().calls.clone()
        }

        pub fn is_verbose(&self) -> bool {
            self.inner.lock().verbose
        }

        /// Make the next (and all subsequent) `exec` calls return this
        /// exit code instead of the default `0`.
        pub fn set_exec_result(&self, result: Result<i32, String>) {
            self.inner.lock().exec_result = result;
        }
    }

    #[async_trait]
    impl Shell for FakeShell {
        fn is_trusted(&self, dir: &Path) -> bool {
            self.inner.lock().trusted.contains(dir)
        }

        fn add_trusted(&self, dir: &Path) -> Result<(), ShellError> {
            let mut state = self.inner.lock();
            state.trusted.insert(dir.to_path_buf());
            state.calls.push(ShellCall::AddTrusted(dir.to_path_buf()));
            Ok(())
        }

        fn set_verbose(&self, verbose: bool) {
            self.inner.lock().verbose = verbose;
        }

        fn wants_reset(&self) -> bool {
            self.inner.lock().wants_reset
        }

        fn reset(&self, quiet: bool) -> Result<(), ShellError> {
            self.inner.lock().calls.push(ShellCall::Reset { quiet });
            Ok(())
        }

        fn write_reset_token(&self) -> Result<(), ShellError> {
            let mut state = self.inner.lock();
            state.calls.push(ShellCall::WriteResetToken);
            if state.fail_reset_token {
                return Err(ShellError::Reset("fake failure".into()));
            }
            Ok(())
        }

        fn print_env(&self, _vars: &HashMap<String, String>) {}

        fn install_hook(&self, shell_type: &str) -> Result<(), ShellError> {
            self.inner
                .lock()
                .calls
                .push(ShellCall::InstallHook(shell_type.to_string()));
            Ok(())
        }

        async fn exec(
            &self,
            command: &str,
            args: &[String],
            env: &HashMap<String, String>,
        ) -> Result<i32, ShellError> {
            let mut state = self.inner.lock();
            state.calls.push(ShellCall::Exec {
                command: command.to_string(),
                args: args.to_vec(),
                env: env.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            });
            state
                .exec_result
                .clone()
                .map_err(ShellError::Exec)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeShell, ShellCall};

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
