#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const ADMIN_PASSWORD: &str = "adm1n";

/// A temporary data directory for tasktrack
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    /// Data directory initialized through `tasktrack init`
    pub fn initialized() -> Self {
        let test_dir = Self::new();
        test_dir
            .raw_command()
            .args(["init", "--admin-password", ADMIN_PASSWORD])
            .assert()
            .success();
        test_dir
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.file(name);
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.file(name)).expect("read file")
    }

    /// Command pointed at this directory with no credentials
    pub fn raw_command(&self) -> Command {
        let mut cmd = Command::cargo_bin("tasktrack").expect("binary");
        cmd.env_remove("TASKTRACK_USER")
            .env_remove("TASKTRACK_PASSWORD")
            .env_remove("RUST_LOG")
            .env("TASKTRACK_DIR", self.path());
        cmd
    }

    /// Command authenticated as `user`
    pub fn command_as(&self, user: &str, password: &str) -> Command {
        let mut cmd = self.raw_command();
        cmd.env("TASKTRACK_USER", user)
            .env("TASKTRACK_PASSWORD", password);
        cmd
    }

    pub fn admin(&self) -> Command {
        self.command_as("admin", ADMIN_PASSWORD)
    }

    pub fn register(&self, user: &str, password: &str) {
        self.admin()
            .args(["user", "register", user, "--new-password", password])
            .assert()
            .success();
    }

    pub fn add_task(&self, assign: &str, title: &str, due: &str) {
        self.admin()
            .args([
                "task",
                "add",
                "--assign",
                assign,
                "--title",
                title,
                "--description",
                "details",
                "--due",
                due,
            ])
            .assert()
            .success();
    }

    /// Run with `--json` and parse stdout
    pub fn json(&self, cmd: &mut Command) -> serde_json::Value {
        let output = cmd.arg("--json").output().expect("run command");
        serde_json::from_slice(&output.stdout).expect("json output")
    }
}
