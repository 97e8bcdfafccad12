//! CLI help and usage output specs.

use crate::prelude::*;

#[test]
fn no_subcommand_fails_and_shows_usage() {
    cli().fails().stderr_has("Usage:");
}

#[test]
fn help_shows_usage_and_every_verb() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("init")
        .stdout_has("up")
        .stdout_has("down")
        .stdout_has("install")
        .stdout_has("env")
        .stdout_has("exec")
        .stdout_has("check")
        .stdout_has("artifact")
        .stdout_has("hook")
        .stdout_has("build-id")
        .stdout_has("context");
}

#[test]
fn check_help_shows_subcommands() {
    cli()
        .args(&["check", "--help"])
        .passes()
        .stdout_has("tools")
        .stdout_has("node-health");
}

#[test]
fn artifact_help_shows_subcommands() {
    cli()
        .args(&["artifact", "--help"])
        .passes()
        .stdout_has("bundle")
        .stdout_has("push");
}

#[test]
fn context_help_shows_subcommands() {
    cli()
        .args(&["context", "--help"])
        .passes()
        .stdout_has("get")
        .stdout_has("set");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

#[test]
fn unknown_command_fails_with_usage() {
    cli().args(&["frobnicate"]).fails().stderr_has("Usage:");
}
