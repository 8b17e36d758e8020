//! Command-line interface for taskman
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::{Error, Result};
use crate::roster::Roster;
use crate::session::{self, Session};
use crate::store::Store;

mod init;
mod report;
mod task;
mod user;

/// taskman - team task tracker
///
/// A CLI that tracks tasks for a small team over flat text files, with
/// per-user assignment, due-date tracking, and admin reports.
#[derive(Parser, Debug)]
#[command(name = "taskman")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding the user and task files (defaults to current directory)
    #[arg(long, global = true, env = "TASKMAN_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Username to act as
    #[arg(long, global = true, env = "TASKMAN_USER")]
    pub user: Option<String>,

    /// Password for the acting user
    #[arg(long, global = true, env = "TASKMAN_PASSWORD")]
    pub password: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a data directory with the default admin account
    Init,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// User management
    #[command(subcommand)]
    User(UserCommands),

    /// Reports over tasks and users
    #[command(subcommand)]
    Report(ReportCommands),
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task for a user
    Add {
        /// Username the task is assigned to
        #[arg(long = "to")]
        assigned_to: String,

        /// Task title (5-30 characters)
        #[arg(long)]
        title: String,

        /// Task description (5-1000 characters)
        #[arg(long)]
        description: String,

        /// Due date in DD/MM/YYYY, up to 18 months ahead
        #[arg(long)]
        due: String,
    },

    /// List tasks, mine by default
    List {
        /// Filter: incomplete, completed, overdue, orphaned, or all
        #[arg(short, long)]
        filter: Option<String>,

        /// Show everyone's tasks instead of only mine
        #[arg(long)]
        everyone: bool,
    },

    /// Mark a task as complete
    Complete {
        /// Task id or unambiguous id prefix
        id: String,
    },

    /// Hand a task to another user
    Reassign {
        /// Task id or unambiguous id prefix
        id: String,

        /// Username of the new assignee
        #[arg(long = "to")]
        assigned_to: String,
    },

    /// Move a task's due date
    Reschedule {
        /// Task id or unambiguous id prefix
        id: String,

        /// New due date in DD/MM/YYYY
        #[arg(long)]
        due: String,
    },
}

/// User subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a new user
    Register {
        /// Username (5-15 characters, stored lowercase)
        username: String,

        /// Password for the new account (5-15 characters with upper, lower, and digit)
        new_password: String,
    },

    /// Delete a user (admin only)
    Delete {
        /// Username to delete
        username: String,
    },

    /// Change your own password
    Passwd {
        /// New password, must differ from the current one
        new_password: String,
    },
}

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Generate the task and user overview files (admin only)
    Generate,

    /// Display the overview statistics (admin only)
    Show,
}

/// A loaded store plus the authenticated session for one command.
pub(crate) struct CommandContext {
    pub store: Store,
    pub roster: Roster,
    pub session: Session,
}

pub(crate) fn open_store(data_dir: Option<PathBuf>) -> Result<Store> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    Ok(Store::open(dir))
}

/// Open the store and authenticate the acting user. Every command except
/// `init` goes through here.
pub(crate) fn load_context(
    data_dir: Option<PathBuf>,
    user: Option<String>,
    password: Option<String>,
) -> Result<CommandContext> {
    let store = open_store(data_dir)?;
    let roster = store.load_roster()?;
    let user = user.ok_or_else(|| {
        Error::InvalidArgument("missing --user (or TASKMAN_USER)".to_string())
    })?;
    let password = password.ok_or_else(|| {
        Error::InvalidArgument("missing --password (or TASKMAN_PASSWORD)".to_string())
    })?;
    let session = session::authenticate(&roster, &user, &password)?;
    Ok(CommandContext {
        store,
        roster,
        session,
    })
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => init::run(self.data_dir, self.json, self.quiet),
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    assigned_to,
                    title,
                    description,
                    due,
                } => task::run_add(task::AddOptions {
                    assigned_to,
                    title,
                    description,
                    due,
                    data_dir: self.data_dir,
                    user: self.user,
                    password: self.password,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::List { filter, everyone } => task::run_list(task::ListOptions {
                    filter,
                    everyone,
                    data_dir: self.data_dir,
                    user: self.user,
                    password: self.password,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Complete { id } => task::run_complete(task::CompleteOptions {
                    id,
                    data_dir: self.data_dir,
                    user: self.user,
                    password: self.password,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Reassign { id, assigned_to } => {
                    task::run_reassign(task::ReassignOptions {
                        id,
                        assigned_to,
                        data_dir: self.data_dir,
                        user: self.user,
                        password: self.password,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
                TaskCommands::Reschedule { id, due } => {
                    task::run_reschedule(task::RescheduleOptions {
                        id,
                        due,
                        data_dir: self.data_dir,
                        user: self.user,
                        password: self.password,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
            },
            Commands::User(cmd) => match cmd {
                UserCommands::Register { username, new_password } => {
                    user::run_register(user::RegisterOptions {
                        username,
                        new_password,
                        data_dir: self.data_dir,
                        user: self.user,
                        password: self.password,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
                UserCommands::Delete { username } => user::run_delete(user::DeleteOptions {
                    username,
                    data_dir: self.data_dir,
                    user: self.user,
                    password: self.password,
                    json: self.json,
                    quiet: self.quiet,
                }),
                UserCommands::Passwd { new_password } => user::run_passwd(user::PasswdOptions {
                    new_password,
                    data_dir: self.data_dir,
                    user: self.user,
                    password: self.password,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Report(cmd) => match cmd {
                ReportCommands::Generate => report::run_generate(report::GenerateOptions {
                    data_dir: self.data_dir,
                    user: self.user,
                    password: self.password,
                    json: self.json,
                    quiet: self.quiet,
                }),
                ReportCommands::Show => report::run_show(report::ShowOptions {
                    data_dir: self.data_dir,
                    user: self.user,
                    password: self.password,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
        }
    }
}
