//! `outpost artifact` specs: bundle and push.

use crate::prelude::*;

#[test]
fn bundle_requires_output_path() {
    Project::empty()
        .outpost()
        .args(&["artifact", "bundle", "--output-path", ""])
        .fails()
        .stderr_has("missing-output-path");
}

#[test]
fn bundle_writes_to_the_given_path() {
    let project = Project::empty();
    let output = project.path().join("bundle.tar");

    project
        .outpost()
        .args(&["artifact", "bundle", "--output-path", output.to_str().unwrap()])
        .passes()
        .stdout_has("Artifact bundled to");
}

#[test]
fn push_requires_registry_base() {
    Project::empty()
        .outpost()
        .args(&["artifact", "push", "--registry-base", "", "--repo-name", "infra"])
        .fails()
        .stderr_has("missing parameter: registryBase");
}

#[test]
fn push_requires_repo_name() {
    Project::empty()
        .outpost()
        .args(&["artifact", "push", "--registry-base", "ghcr.io/acme", "--repo-name", ""])
        .fails()
        .stderr_has("missing parameter: repoName");
}

#[test]
fn push_succeeds_with_registry_and_repo() {
    Project::empty()
        .outpost()
        .args(&[
            "artifact",
            "push",
            "--registry-base",
            "ghcr.io/acme",
            "--repo-name",
            "infra",
            "--tag",
            "v1",
        ])
        .passes()
        .stdout_has("Artifact pushed to ghcr.io/acme/infra:v1");
}
