//! taskman init command implementation
//!
//! Creates the data directory, default config, and seeded store files.

use std::path::PathBuf;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::roster::ADMIN_USER;

pub fn run(data_dir: Option<PathBuf>, json: bool, quiet: bool) -> Result<()> {
    let store = super::open_store(data_dir)?;
    let report = store.init()?;
    let config = store.config();

    // File names may be overridden by a pre-existing taskman.toml.
    let mut created_items: Vec<String> = Vec::new();
    if report.created_config {
        created_items.push("taskman.toml".to_string());
    }
    if report.created_users_file {
        created_items.push(config.store.users_file.clone());
    }
    if report.created_tasks_file {
        created_items.push(config.store.tasks_file.clone());
    }

    let header = if created_items.is_empty() {
        "taskman init: nothing to do".to_string()
    } else {
        "taskman init: initialized data directory".to_string()
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("data dir", report.data_dir.display().to_string());
    human.push_summary(
        "created",
        if created_items.is_empty() {
            "none".to_string()
        } else {
            created_items.join(", ")
        },
    );
    if report.created_users_file {
        human.push_warning(format!(
            "seeded '{ADMIN_USER}' with the default password; change it"
        ));
        human.push_next_step(format!(
            "taskman user passwd <new-password> --user {ADMIN_USER} --password password"
        ));
    }
    human.push_next_step("taskman user register <username> <password>");
    human.push_next_step("taskman task add --to <username> --title \"...\" --description \"...\" --due DD/MM/YYYY");

    emit_success(OutputOptions { json, quiet }, "init", &report, Some(&human))?;

    Ok(())
}
