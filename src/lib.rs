//! taskman - Team Task Tracker Library
//!
//! This library provides the core functionality for the taskman CLI tool,
//! tracking tasks for a small team over flat text files.
//!
//! # Core Concepts
//!
//! - **Flat-file store**: `user.txt` and `tasks.txt` with `;`-joined records,
//!   rewritten in full on every mutation
//! - **Sessions**: every command authenticates explicitly; the `admin`
//!   account unlocks user deletion and reports
//! - **Filters**: derived views (incomplete, completed, overdue, orphaned)
//!   computed per invocation, never persisted
//! - **Reports**: task and user overviews rendered to fixed-width text files
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskman.toml`
//! - `error`: Error types and result aliases
//! - `filter`: Filtered task views
//! - `output`: Human and JSON output envelopes
//! - `report`: Task and user overview aggregation
//! - `roster`: User accounts and credential rules
//! - `session`: Login verification
//! - `store`: Flat-file persistence with atomic rewrites
//! - `task`: Task records and status transitions

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod report;
pub mod roster;
pub mod session;
pub mod store;
pub mod task;

pub use error::{Error, Result};
