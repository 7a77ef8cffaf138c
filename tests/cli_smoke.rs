mod support;

use predicates::prelude::*;
use predicates::str::contains;
use support::{TestDir, ADMIN_PASSWORD};

#[test]
fn tasktrack_help_works() {
    TestDir::new()
        .raw_command()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Flat-file task tracker for small teams"));
}

#[test]
fn subcommand_help_works() {
    let dir = TestDir::new();
    for cmd in ["init", "login", "user", "task", "report"] {
        dir.raw_command().arg(cmd).arg("--help").assert().success();
    }
}

#[test]
fn init_creates_stores() {
    let dir = TestDir::initialized();

    assert_eq!(dir.read_file("user.txt"), format!("admin, {ADMIN_PASSWORD}"));
    assert_eq!(dir.read_file("tasks.txt"), "");
    assert!(dir.file(".tasktrack.toml").exists());
}

#[test]
fn init_refuses_existing_user_store() {
    let dir = TestDir::initialized();
    dir.raw_command()
        .args(["init", "--admin-password", "other"])
        .assert()
        .code(2)
        .stderr(contains("already initialized"));
    assert_eq!(dir.read_file("user.txt"), format!("admin, {ADMIN_PASSWORD}"));
}

#[test]
fn commands_before_init_report_missing_store() {
    let dir = TestDir::new();
    dir.admin()
        .arg("login")
        .assert()
        .code(4)
        .stderr(contains("Store unavailable").and(contains("tasktrack init")));
}

#[test]
fn login_requires_credentials() {
    let dir = TestDir::initialized();
    dir.raw_command()
        .arg("login")
        .assert()
        .code(2)
        .stderr(contains("--user is required"));

    dir.command_as("admin", "wrong")
        .arg("login")
        .assert()
        .code(2)
        .stderr(contains("Incorrect password"));

    dir.command_as("nobody", "pw")
        .arg("login")
        .assert()
        .code(2)
        .stderr(contains("User not found"));
}

#[test]
fn login_reports_role() {
    let dir = TestDir::initialized();
    dir.register("bob", "secret");

    let admin = dir.json(dir.admin().arg("login"));
    assert_eq!(admin["schema_version"], "tasktrack.v1");
    assert_eq!(admin["command"], "login");
    assert_eq!(admin["data"]["role"], "admin");

    let bob = dir.json(dir.command_as("bob", "secret").arg("login"));
    assert_eq!(bob["data"]["role"], "user");
    assert_eq!(bob["data"]["assigned_tasks"], 0);
}

#[test]
fn json_errors_use_envelope() {
    let dir = TestDir::initialized();
    let value = dir.json(dir.command_as("admin", "wrong").arg("login"));
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"]["code"], 2);
    assert_eq!(value["error"]["kind"], "user_error");
}

#[test]
fn quiet_suppresses_output() {
    let dir = TestDir::initialized();
    dir.admin()
        .args(["login", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
