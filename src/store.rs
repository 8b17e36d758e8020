//! Flat-file store for users and tasks.
//!
//! # Layout
//!
//! ```text
//! <data-dir>/
//!   taskman.toml        # configuration (file names below are defaults)
//!   user.txt            # username;password per line
//!   tasks.txt           # one task record per line
//!   task_overview.txt   # generated report (admin)
//!   user_overview.txt   # generated report (admin)
//! ```
//!
//! Every mutation rewrites the affected file in full via temp file + rename,
//! so readers see either the prior state or the new state, never a partial
//! write. A single interactive process is assumed; there is no locking.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::roster::{Roster, User, ADMIN_USER};
use crate::task::{self, Task};

const CONFIG_FILE: &str = "taskman.toml";
const DEFAULT_ADMIN_PASSWORD: &str = "password";

/// Store manager rooted at a data directory.
#[derive(Debug, Clone)]
pub struct Store {
    data_dir: PathBuf,
    config: Config,
}

/// What `init` created (existing files are left untouched).
#[derive(Debug, Clone, serde::Serialize)]
pub struct InitReport {
    pub data_dir: PathBuf,
    pub created_config: bool,
    pub created_users_file: bool,
    pub created_tasks_file: bool,
}

impl Store {
    pub fn new(data_dir: PathBuf, config: Config) -> Self {
        Self { data_dir, config }
    }

    /// Open a store at the given directory, reading `taskman.toml` if present.
    pub fn open(data_dir: PathBuf) -> Self {
        let config = Config::load_from_dir(&data_dir);
        Self::new(data_dir, config)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.config.store.users_file)
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join(&self.config.store.tasks_file)
    }

    pub fn task_overview_path(&self) -> PathBuf {
        self.data_dir.join(&self.config.reports.task_overview_file)
    }

    pub fn user_overview_path(&self) -> PathBuf {
        self.data_dir.join(&self.config.reports.user_overview_file)
    }

    pub fn is_initialized(&self) -> bool {
        self.users_path().exists() && self.tasks_path().exists()
    }

    /// Create the data directory, a default config, a user file seeded with
    /// the admin account, and an empty tasks file. Existing files are kept.
    pub fn init(&self) -> Result<InitReport> {
        fs::create_dir_all(&self.data_dir)?;

        let config_path = self.config_path();
        let created_config = if config_path.exists() {
            false
        } else {
            self.config.save(&config_path)?;
            true
        };

        let users_path = self.users_path();
        let created_users_file = if users_path.exists() {
            false
        } else {
            self.write_atomic(
                &users_path,
                format!("{ADMIN_USER};{DEFAULT_ADMIN_PASSWORD}\n").as_bytes(),
            )?;
            true
        };

        let tasks_path = self.tasks_path();
        let created_tasks_file = if tasks_path.exists() {
            false
        } else {
            self.write_atomic(&tasks_path, b"")?;
            true
        };

        Ok(InitReport {
            data_dir: self.data_dir.clone(),
            created_config,
            created_users_file,
            created_tasks_file,
        })
    }

    // =========================================================================
    // User roster
    // =========================================================================

    /// Load the roster in file order. A malformed line fails the whole load.
    pub fn load_roster(&self) -> Result<Roster> {
        let path = self.users_path();
        if !path.exists() {
            return Err(Error::NotInitialized(self.data_dir.clone()));
        }

        let content = fs::read_to_string(&path)?;
        let mut users = Vec::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (username, password) = line.split_once(';').ok_or_else(|| Error::StoreCorrupt {
                file: self.config.store.users_file.clone(),
                line: number + 1,
                reason: "expected username;password".to_string(),
            })?;
            users.push(User {
                username: username.trim().to_lowercase(),
                password: password.to_string(),
            });
        }
        Ok(Roster::from_vec(users))
    }

    /// Rewrite the user file in full, preserving roster order.
    pub fn save_roster(&self, roster: &Roster) -> Result<()> {
        let mut buffer = Vec::new();
        for user in roster.users() {
            writeln!(buffer, "{};{}", user.username, user.password)?;
        }
        self.write_atomic(&self.users_path(), &buffer)
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Load all tasks, ascending by due date. Equal due dates keep the order
    /// encountered in the file. Legacy records without an id receive a fresh
    /// one, persisted on the next save.
    pub fn load_tasks(&self) -> Result<Vec<Task>> {
        let path = self.tasks_path();
        if !path.exists() {
            return Err(Error::NotInitialized(self.data_dir.clone()));
        }

        let content = fs::read_to_string(&path)?;
        let mut tasks = Vec::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let task = Task::parse_record(line).map_err(|reason| Error::StoreCorrupt {
                file: self.config.store.tasks_file.clone(),
                line: number + 1,
                reason,
            })?;
            tasks.push(task);
        }

        let mut seen: HashSet<String> = tasks
            .iter()
            .filter(|task| !task.id.is_empty())
            .map(|task| task.id.clone())
            .collect();
        for task in &mut tasks {
            if task.id.is_empty() {
                let id = task::generate_id(&seen);
                seen.insert(id.clone());
                task.id = id;
            }
        }

        tasks.sort_by_key(|task| task.due_date);
        Ok(tasks)
    }

    /// Rewrite the tasks file in full (write-through for every mutation).
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        let mut buffer = Vec::new();
        for task in tasks {
            writeln!(buffer, "{}", task.to_record())?;
        }
        self.write_atomic(&self.tasks_path(), &buffer)
    }

    // =========================================================================
    // Reports
    // =========================================================================

    pub fn write_task_overview(&self, text: &str) -> Result<()> {
        self.write_atomic(&self.task_overview_path(), text.as_bytes())
    }

    pub fn write_user_overview(&self, text: &str) -> Result<()> {
        self.write_atomic(&self.user_overview_path(), text.as_bytes())
    }

    /// Write data atomically using temp file + rename, so the file is either
    /// fully written or untouched.
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    fn store() -> (TempDir, Store) {
        let temp = TempDir::new().expect("tempdir");
        let store = Store::open(temp.path().to_path_buf());
        store.init().expect("init");
        (temp, store)
    }

    fn task(id: &str, due: NaiveDate) -> Task {
        Task {
            id: id.to_string(),
            assigned_to: "alice".to_string(),
            assigned_by: "admin".to_string(),
            title: "Review PR".to_string(),
            description: "Look over the open pull request".to_string(),
            due_date: due,
            date_assigned: date(2026, 1, 10),
            completed: false,
        }
    }

    #[test]
    fn init_seeds_admin_and_empty_tasks() {
        let (_temp, store) = store();
        assert!(store.is_initialized());

        let roster = store.load_roster().expect("roster");
        assert_eq!(roster.len(), 1);
        let admin = roster.find("admin").expect("admin");
        assert_eq!(admin.password, "password");

        let tasks = store.load_tasks().expect("tasks");
        assert!(tasks.is_empty());

        // Re-running init leaves existing files alone.
        let report = store.init().expect("reinit");
        assert!(!report.created_users_file);
        assert!(!report.created_tasks_file);
        assert!(!report.created_config);
    }

    #[test]
    fn load_without_init_fails() {
        let temp = TempDir::new().expect("tempdir");
        let store = Store::open(temp.path().to_path_buf());
        assert!(matches!(
            store.load_roster(),
            Err(Error::NotInitialized(_))
        ));
        assert!(matches!(store.load_tasks(), Err(Error::NotInitialized(_))));
    }

    #[test]
    fn tasks_load_sorted_by_due_date_stable() {
        let (_temp, store) = store();
        let tasks = vec![
            task("task-bb22", date(2026, 3, 1)),
            task("task-aa11", date(2026, 2, 1)),
            task("task-cc33", date(2026, 3, 1)),
        ];
        store.save_tasks(&tasks).expect("save");

        let loaded = store.load_tasks().expect("load");
        let ids: Vec<&str> = loaded.iter().map(|task| task.id.as_str()).collect();
        // Ascending due date; the two equal dates keep file order.
        assert_eq!(ids, vec!["task-aa11", "task-bb22", "task-cc33"]);
    }

    #[test]
    fn legacy_records_receive_ids() {
        let (_temp, store) = store();
        fs::write(
            store.tasks_path(),
            "alice;admin;Review PR;Look over the pull request;18/01/2026;15/01/2026;No\n",
        )
        .expect("write legacy");

        let loaded = store.load_tasks().expect("load");
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].id.starts_with("task-"));

        // Saving persists the assigned id.
        store.save_tasks(&loaded).expect("save");
        let content = fs::read_to_string(store.tasks_path()).expect("read");
        assert!(content.starts_with("task-"));
    }

    #[test]
    fn malformed_task_record_fails_whole_load() {
        let (_temp, store) = store();
        fs::write(
            store.tasks_path(),
            "task-aa11;alice;admin;Review PR;Look this over;18/01/2026;15/01/2026;No\nnot a record\n",
        )
        .expect("write");

        let err = store.load_tasks().expect_err("corrupt");
        match err {
            Error::StoreCorrupt { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_user_record_fails_whole_load() {
        let (_temp, store) = store();
        fs::write(store.users_path(), "admin;password\nno-separator\n").expect("write");

        let err = store.load_roster().expect_err("corrupt");
        match err {
            Error::StoreCorrupt { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn roster_round_trip_preserves_order() {
        let (_temp, store) = store();
        let mut roster = store.load_roster().expect("roster");
        roster.register("zelda", "Zelda123").expect("register");
        roster.register("alice", "Alice123").expect("register");
        store.save_roster(&roster).expect("save");

        let loaded = store.load_roster().expect("reload");
        let names: Vec<&str> = loaded
            .users()
            .iter()
            .map(|user| user.username.as_str())
            .collect();
        assert_eq!(names, vec!["admin", "zelda", "alice"]);
    }
}
