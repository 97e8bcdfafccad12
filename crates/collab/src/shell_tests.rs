// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use outpost_shims::OsShims;

#[tokio::test]
async fn add_trusted_persists_across_init() {
    let dir = tempfile::tempdir().unwrap();
    let shims: Arc<dyn Shims> = Arc::new(OsShims);
    let shell = RealShell::new(shims.clone(), dir.path().to_path_buf());
    shell.init().unwrap();
    shell.add_trusted(Path::new("/proj")).unwrap();

    let reloaded = RealShell::new(shims, dir.path().to_path_buf());
    reloaded.init().unwrap();
    assert!(reloaded.is_trusted(Path::new("/proj")));
}

#[tokio::test]
async fn untrusted_dir_reports_false() {
    let dir = tempfile::tempdir().unwrap();
    let shell = RealShell::new(Arc::new(OsShims), dir.path().to_path_buf());
    shell.init().unwrap();
    assert!(!shell.is_trusted(Path::new("/elsewhere")));
}

#[tokio::test]
async fn install_hook_rejects_unknown_shell_type() {
    let dir = tempfile::tempdir().unwrap();
    let shell = RealShell::new(Arc::new(OsShims), dir.path().to_path_buf());
    assert!(shell.install_hook("bash").is_ok());
    assert!(matches!(
        shell.install_hook("cmd.exe"),
        Err(ShellError::UnsupportedShellType(_))
    ));
}

#[tokio::test]
async fn exec_runs_real_command_and_returns_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let shell = RealShell::new(Arc::new(OsShims), dir.path().to_path_buf());
    let code = shell
        .exec("true", &[], &HashMap::new())
        .await
        .unwrap();
    assert_eq!(code, 0);
}

#[tokio::test]
async fn fake_shell_records_calls() {
    let shell = FakeShell::new();
    shell.add_trusted(Path::new("/proj")).unwrap();
    shell.reset(true).unwrap();
    shell.write_reset_token().unwrap();
    shell.install_hook("zsh").unwrap();

    assert_eq!(
        shell.calls(),
        vec![
            ShellCall::AddTrusted(PathBuf::from("/proj")),
            ShellCall::Reset { quiet: true },
            ShellCall::WriteResetToken,
            ShellCall::InstallHook("zsh".to_string()),
        ]
    );
}

#[tokio::test]
async fn fake_shell_can_simulate_reset_token_failure() {
    let shell = FakeShell::new();
    shell.fail_reset_token();
    assert!(shell.write_reset_token().is_err());
}
