//! `outpost env` specs: untrusted-directory guard and variable printing.

use crate::prelude::*;

#[test]
fn untrusted_directory_warns_and_exits_zero() {
    Project::empty()
        .outpost()
        .args(&["env"])
        .passes()
        .stderr_has("outpost: directory is not trusted. Run `outpost init` here first.");
}

#[test]
fn hook_mode_suppresses_the_untrusted_warning() {
    Project::empty()
        .outpost()
        .args(&["env", "--hook"])
        .passes()
        .stderr_lacks("outpost: directory is not trusted");
}

#[test]
fn trusted_directory_prints_exports() {
    Project::empty()
        .outpost()
        .args(&["--trust", "env"])
        .passes()
        .stdout_has("export ");
}
