#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use chrono::{Duration, Local};
use tempfile::TempDir;

pub const ADMIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password";

/// An initialized data directory with the seeded admin account.
pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    pub fn init() -> Result<Self, Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        taskman_cmd()
            .arg("init")
            .arg("--data-dir")
            .arg(dir.path())
            .assert()
            .success();
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Command pre-wired with the data directory and credentials.
    pub fn cmd_as(&self, user: &str, password: &str) -> Command {
        let mut cmd = taskman_cmd();
        cmd.arg("--data-dir")
            .arg(self.path())
            .arg("--user")
            .arg(user)
            .arg("--password")
            .arg(password);
        cmd
    }

    pub fn cmd_as_admin(&self) -> Command {
        self.cmd_as(ADMIN, ADMIN_PASSWORD)
    }

    pub fn register_user(&self, username: &str, password: &str) {
        self.cmd_as_admin()
            .args(["user", "register", username, password])
            .assert()
            .success();
    }

    pub fn add_task(&self, assigned_to: &str, title: &str) {
        self.cmd_as_admin()
            .args([
                "task",
                "add",
                "--to",
                assigned_to,
                "--title",
                title,
                "--description",
                "A task created by the test suite",
                "--due",
                &due_in_days(7),
            ])
            .assert()
            .success();
    }
}

pub fn taskman_cmd() -> Command {
    let mut cmd = Command::cargo_bin("taskman").expect("binary");
    // Credentials from the host environment must not leak into tests.
    cmd.env_remove("TASKMAN_DIR")
        .env_remove("TASKMAN_USER")
        .env_remove("TASKMAN_PASSWORD");
    cmd
}

/// A valid due date N days from now, in DD/MM/YYYY.
pub fn due_in_days(days: i64) -> String {
    (Local::now().date_naive() + Duration::days(days))
        .format("%d/%m/%Y")
        .to_string()
}
