//! `outpost build-id` specs: generation and persistence under
//! `.windsor/.build-id`.

use crate::prelude::*;

#[test]
fn first_run_creates_a_build_id() {
    let project = Project::empty();

    let run = project.outpost().args(&["build-id"]).passes();
    let printed = run.stdout();
    assert!(!printed.trim().is_empty());

    let persisted = project
        .windsor_file(".build-id")
        .expect("build id should be persisted under .windsor/.build-id");
    assert_eq!(persisted.trim(), printed.trim());
}

#[test]
fn repeat_runs_keep_the_date_and_random_but_bump_the_counter() {
    let project = Project::empty();

    let first = project.outpost().args(&["build-id"]).passes().stdout();
    let second = project.outpost().args(&["build-id"]).passes().stdout();

    let first_parts: Vec<&str> = first.trim().split('.').collect();
    let second_parts: Vec<&str> = second.trim().split('.').collect();
    assert_eq!(first_parts[0], second_parts[0], "date should be stable");
    assert_eq!(first_parts[1], second_parts[1], "random should be stable");
    assert_eq!(first_parts[2], "1");
    assert_eq!(second_parts[2], "2");
}

#[test]
fn new_flag_forces_a_fresh_counter() {
    let project = Project::empty();

    project.outpost().args(&["build-id"]).passes();
    project.outpost().args(&["build-id"]).passes();
    let regenerated = project
        .outpost()
        .args(&["build-id", "--new"])
        .passes()
        .stdout();

    let parts: Vec<&str> = regenerated.trim().split('.').collect();
    assert_eq!(parts[2], "1", "--new resets the counter");
}
