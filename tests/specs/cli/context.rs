//! `outpost context` specs: get/set the active context.

use crate::prelude::*;

#[test]
fn get_defaults_to_local() {
    Project::empty()
        .outpost()
        .args(&["context", "get"])
        .passes()
        .stdout_has("local");
}

#[test]
fn set_reports_the_new_context() {
    Project::empty()
        .outpost()
        .args(&["context", "set", "production"])
        .passes()
        .stdout_has("Context set to: production");
}

#[test]
fn global_context_flag_selects_what_get_reports() {
    // Each invocation is a fresh process with a fresh, unpersisted
    // `ConfigHandler`, so `set` in one run has no effect on a later run's
    // `get` — the `--context` flag is what actually selects the context
    // a given invocation reports.
    Project::empty()
        .outpost()
        .args(&["--context", "staging", "context", "get"])
        .passes()
        .stdout_has("staging");
}

#[test]
fn set_requires_a_name() {
    Project::empty()
        .outpost()
        .args(&["context", "set", ""])
        .fails()
        .stderr_has("missing parameter: contextName");
}
