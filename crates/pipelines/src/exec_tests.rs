// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use outpost_collab::{FakeConfigHandler, FakeShell, ShellCall};
use outpost_registry::Registry;

fn init(pipeline: &ExecPipeline, registry: &Registry, shell: Arc<FakeShell>) {
    let config_handler = Arc::new(FakeConfigHandler::new());
    config_handler.set_loaded(true);
    registry.register("shell", shell as Arc<dyn Shell>);
    registry.register(
        "configHandler",
        config_handler as Arc<dyn outpost_collab::ConfigHandler>,
    );
    pipeline
        .initialize(registry, Path::new("/project"), &ParamBag::builder().build())
        .expect("initialize should succeed");
}

#[tokio::test]
async fn runs_command_with_args_and_collected_env() {
    let registry = Registry::new();
    let shell = Arc::new(FakeShell::new());
    let pipeline = ExecPipeline::new();
    init(&pipeline, &registry, shell.clone());

    let bag = ParamBag::builder()
        .str("command", "echo")
        .seq("args", vec!["hello".to_string(), "world".to_string()])
        .build();
    pipeline.execute(&bag).await.expect("execute should succeed");

    let calls = shell.calls();
    let exec_call = calls
        .iter()
        .find(|c| matches!(c, ShellCall::Exec { .. }))
        .expect("exec should have been called");
    match exec_call {
        ShellCall::Exec { command, args, env } => {
            assert_eq!(command, "echo");
            assert_eq!(args, &vec!["hello".to_string(), "world".to_string()]);
            assert_eq!(env.get("WINDSOR_CONTEXT"), Some(&"local".to_string()));
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn missing_command_fails() {
    let registry = Registry::new();
    let shell = Arc::new(FakeShell::new());
    let pipeline = ExecPipeline::new();
    init(&pipeline, &registry, shell);

    let err = pipeline
        .execute(&ParamBag::builder().build())
        .await
        .expect_err("should fail");
    assert!(matches!(err, PipelineError::MissingCommand));
}

#[tokio::test]
async fn empty_command_fails() {
    let registry = Registry::new();
    let shell = Arc::new(FakeShell::new());
    let pipeline = ExecPipeline::new();
    init(&pipeline, &registry, shell);

    let bag = ParamBag::builder().str("command", "").build();
    let err = pipeline.execute(&bag).await.expect_err("should fail");
    assert!(matches!(err, PipelineError::MissingCommand));
}

#[tokio::test]
async fn shell_exec_failure_is_wrapped() {
    let registry = Registry::new();
    let shell = Arc::new(FakeShell::new());
    shell.set_exec_result(Err("exit code 127".to_string()));
    let pipeline = ExecPipeline::new();
    init(&pipeline, &registry, shell);

    let bag = ParamBag::builder().str("command", "nonexistent").build();
    let err = pipeline.execute(&bag).await.expect_err("should fail");
    assert!(matches!(err, PipelineError::CommandExecution(_)));
}
