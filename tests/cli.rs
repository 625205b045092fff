//! End-to-end tests for the `pl` binary

mod common;

use assert_cmd::Command;
use common::create_test_tasks_file;
use predicates::prelude::*;
use std::fs;

fn pl() -> Command {
    Command::cargo_bin("pl").unwrap()
}

#[test]
fn test_successful_chain_exits_zero_with_summary() {
    let (temp_dir, path) = create_test_tasks_file(
        r#"
tasks:
  hello:
    run: echo hello
"#,
    );

    pl().current_dir(temp_dir.path())
        .arg("--file")
        .arg(&path)
        .arg("hello")
        .assert()
        .success()
        .stdout(predicate::str::contains("==> hello"))
        .stdout(predicate::str::contains("ok: hello"))
        .stdout(predicate::str::contains("done: 1 task completed"));
}

#[test]
fn test_failing_task_forwards_exit_code() {
    let (temp_dir, path) = create_test_tasks_file(
        r#"
tasks:
  flaky:
    run: exit 7
"#,
    );

    pl().current_dir(temp_dir.path())
        .arg("--file")
        .arg(&path)
        .arg("flaky")
        .assert()
        .failure()
        .code(7)
        .stderr(predicate::str::contains("flaky"));
}

#[test]
fn test_fail_fast_skips_remaining_tasks() {
    let (temp_dir, path) = create_test_tasks_file(
        r#"
tasks:
  first:
    run: exit 3
  second:
    run: echo ran > second.txt
"#,
    );

    pl().current_dir(temp_dir.path())
        .arg("--file")
        .arg(&path)
        .args(["first", "second"])
        .assert()
        .failure()
        .code(3);

    assert!(!temp_dir.path().join("second.txt").exists());
}

#[test]
fn test_unknown_task_is_structural_error() {
    let (temp_dir, path) = create_test_tasks_file("tasks: {}\n");

    pl().current_dir(temp_dir.path())
        .arg("--file")
        .arg(&path)
        .arg("deploy")
        .assert()
        .failure()
        .code(125)
        .stderr(predicate::str::contains("'deploy' is not defined"));
}

#[test]
fn test_cycle_is_structural_error() {
    let (temp_dir, path) = create_test_tasks_file(
        r#"
tasks:
  a:
    needs: [b]
  b:
    needs: [a]
"#,
    );

    pl().current_dir(temp_dir.path())
        .arg("--file")
        .arg(&path)
        .arg("a")
        .assert()
        .failure()
        .code(125)
        .stderr(predicate::str::contains("cyclic task dependency"));
}

#[test]
fn test_env_task_without_setup_points_at_setup() {
    let (temp_dir, path) = create_test_tasks_file(
        r#"
tasks:
  test:
    env: true
    run: echo ran
"#,
    );

    pl().current_dir(temp_dir.path())
        .arg("--file")
        .arg(&path)
        .arg("test")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("run `pl setup` first"));
}

#[test]
fn test_list_shows_public_tasks_and_hides_internal() {
    let temp_dir = tempfile::TempDir::new().unwrap();

    pl().current_dir(temp_dir.path())
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("test"))
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("submodule-sync").not());
}

#[test]
fn test_no_arguments_prints_help() {
    let temp_dir = tempfile::TempDir::new().unwrap();

    pl().current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_project_file_is_discovered_from_subdirectory() {
    let (temp_dir, _path) = create_test_tasks_file(
        r#"
tasks:
  where:
    run: pwd > found.txt
"#,
    );
    let sub_dir = temp_dir.path().join("deep/nested");
    fs::create_dir_all(&sub_dir).unwrap();

    pl().current_dir(&sub_dir).arg("where").assert().success();

    // commands run at the project root, not the invocation directory
    assert!(temp_dir.path().join("found.txt").exists());
}

#[test]
fn test_silent_suppresses_progress_output() {
    let (temp_dir, path) = create_test_tasks_file(
        r#"
tasks:
  quiet-one:
    run: "true"
"#,
    );

    pl().current_dir(temp_dir.path())
        .arg("--file")
        .arg(&path)
        .args(["--silent", "quiet-one"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
