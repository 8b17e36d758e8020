//! taskman user commands: register, delete, passwd.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};

#[derive(Serialize)]
struct UserReport {
    username: String,
    total_users: usize,
}

// =============================================================================
// user register
// =============================================================================

pub struct RegisterOptions {
    pub username: String,
    pub new_password: String,
    pub data_dir: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_register(opts: RegisterOptions) -> Result<()> {
    let mut ctx = super::load_context(opts.data_dir, opts.user, opts.password)?;

    let username = ctx.roster.register(&opts.username, &opts.new_password)?;
    ctx.store.save_roster(&ctx.roster)?;

    tracing::debug!(%username, "user registered");

    let report = UserReport {
        username: username.clone(),
        total_users: ctx.roster.len(),
    };

    let mut human = HumanOutput::new(format!("taskman user register: added {username}"));
    human.push_summary("total users", report.total_users.to_string());
    human.push_next_step(format!(
        "taskman task add --to {username} --title \"...\" --description \"...\" --due DD/MM/YYYY"
    ));

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "user register",
        &report,
        Some(&human),
    )?;

    Ok(())
}

// =============================================================================
// user delete
// =============================================================================

pub struct DeleteOptions {
    pub username: String,
    pub data_dir: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_delete(opts: DeleteOptions) -> Result<()> {
    let mut ctx = super::load_context(opts.data_dir, opts.user, opts.password)?;
    ctx.session.require_admin("user delete")?;

    // Read before rewriting the roster; the count only feeds a warning, so
    // an unreadable task file must not fail a finished delete.
    let tasks = ctx.store.load_tasks().unwrap_or_default();

    let removed = ctx.roster.remove(&opts.username)?;
    ctx.store.save_roster(&ctx.roster)?;

    tracing::debug!(username = %removed.username, "user deleted");

    // Their tasks stay in the store; list views flag the missing assigner.
    let still_assigned = tasks
        .iter()
        .filter(|task| task.assigned_to == removed.username)
        .count();

    let report = UserReport {
        username: removed.username.clone(),
        total_users: ctx.roster.len(),
    };

    let mut human = HumanOutput::new(format!(
        "taskman user delete: removed {}",
        removed.username
    ));
    human.push_summary("total users", report.total_users.to_string());
    if still_assigned > 0 {
        human.push_warning(format!(
            "{still_assigned} task(s) still assigned to {}; reassign them",
            removed.username
        ));
        human.push_next_step("taskman task list --everyone --filter orphaned".to_string());
    }

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "user delete",
        &report,
        Some(&human),
    )?;

    Ok(())
}

// =============================================================================
// user passwd
// =============================================================================

pub struct PasswdOptions {
    pub new_password: String,
    pub data_dir: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_passwd(opts: PasswdOptions) -> Result<()> {
    // The current password doubles as the login credential.
    let current = opts.password.clone();
    let mut ctx = super::load_context(opts.data_dir, opts.user, current.clone())?;

    let username = ctx.session.username().to_string();
    let current = current.unwrap_or_default();
    ctx.roster
        .change_password(&username, &current, &opts.new_password)?;
    ctx.store.save_roster(&ctx.roster)?;

    tracing::debug!(%username, "password changed");

    let report = UserReport {
        username: username.clone(),
        total_users: ctx.roster.len(),
    };

    let human = HumanOutput::new(format!("taskman user passwd: updated {username}"));

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "user passwd",
        &report,
        Some(&human),
    )?;

    Ok(())
}
