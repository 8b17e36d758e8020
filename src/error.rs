//! Error types for taskman
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (failed login, unknown user, bad input)
//! - 3: Blocked by policy (admin required, completed-task immutability)
//! - 4: Operation failed (I/O failure, corrupt store)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskman CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const POLICY_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskman operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Login failed for '{0}'")]
    AuthFailed(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid date '{0}': expected DD/MM/YYYY")]
    InvalidFormat(String),

    #[error("Due date out of range: {0}")]
    InvalidDateRange(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Store not initialized at {0}")]
    NotInitialized(PathBuf),

    // Policy blocks (exit code 3)
    #[error("Task {0} is already completed")]
    AlreadyCompleted(String),

    #[error("Task {0} is not assigned to you")]
    NotAssignee(String),

    #[error("'{0}' requires admin rights")]
    AdminRequired(String),

    #[error("User '{0}' cannot be deleted")]
    ProtectedUser(String),

    // Operation failures (exit code 4)
    #[error("Corrupt record in {file} at line {line}: {reason}")]
    StoreCorrupt {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::AuthFailed(_)
            | Error::UnknownUser(_)
            | Error::TaskNotFound(_)
            | Error::InvalidFormat(_)
            | Error::InvalidDateRange(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_)
            | Error::NotInitialized(_) => exit_codes::USER_ERROR,

            // Policy blocks
            Error::AlreadyCompleted(_)
            | Error::NotAssignee(_)
            | Error::AdminRequired(_)
            | Error::ProtectedUser(_) => exit_codes::POLICY_BLOCKED,

            // Operation failures
            Error::StoreCorrupt { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured fields for JSON consumers, when the error carries any.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::StoreCorrupt { file, line, reason } => Some(serde_json::json!({
                "file": file,
                "line": line,
                "reason": reason,
            })),
            Error::NotInitialized(path) => Some(serde_json::json!({
                "data_dir": path.to_string_lossy(),
            })),
            _ => None,
        }
    }
}

/// Result type alias for taskman operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
