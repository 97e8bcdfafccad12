//! `outpost exec` specs: run a command with the context environment
//! populated.

use crate::prelude::*;

#[test]
fn runs_the_given_command() {
    Project::empty()
        .outpost()
        .args(&["exec", "--", "echo", "hello"])
        .passes()
        .stdout_has("hello");
}

#[test]
fn passes_even_when_the_child_exits_nonzero() {
    // Execute only propagates a failure from the shell primitive itself
    // (e.g. the command could not be spawned); the child's own exit code
    // is not surfaced as the outpost process's exit code.
    Project::empty()
        .outpost()
        .args(&["exec", "--", "sh", "-c", "exit 3"])
        .passes();
}

#[test]
fn missing_command_argument_fails_usage() {
    Project::empty()
        .outpost()
        .args(&["exec", "--"])
        .fails()
        .stderr_has("Usage:");
}

#[test]
fn empty_command_string_fails_missing_command() {
    Project::empty()
        .outpost()
        .args(&["exec", "--", ""])
        .fails()
        .stderr_has("missing-command");
}
