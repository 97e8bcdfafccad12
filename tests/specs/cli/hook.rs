//! `outpost hook` specs: shell integration hook install.

use crate::prelude::*;

#[test]
fn bash_is_a_supported_shell() {
    Project::empty().outpost().args(&["hook", "bash"]).passes();
}

#[test]
fn zsh_is_a_supported_shell() {
    Project::empty().outpost().args(&["hook", "zsh"]).passes();
}

#[test]
fn fish_is_a_supported_shell() {
    Project::empty().outpost().args(&["hook", "fish"]).passes();
}

#[test]
fn pwsh_is_a_supported_shell() {
    Project::empty().outpost().args(&["hook", "pwsh"]).passes();
}

#[test]
fn unsupported_shell_fails() {
    Project::empty()
        .outpost()
        .args(&["hook", "tcsh"])
        .fails()
        .stderr_has("tcsh");
}
