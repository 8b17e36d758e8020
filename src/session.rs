//! Login session resolution.
//!
//! Credentials arrive via `--user`/`--password` (or the `TASKMAN_USER` /
//! `TASKMAN_PASSWORD` environment variables) and are verified against the
//! roster on every invocation. The session value is threaded explicitly
//! through command handlers; there is no global current-user state.

use crate::error::{Error, Result};
use crate::roster::{Roster, ADMIN_USER};

/// An authenticated user for the duration of one command.
#[derive(Debug, Clone)]
pub struct Session {
    username: String,
}

impl Session {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_admin(&self) -> bool {
        self.username == ADMIN_USER
    }

    /// Fail unless the session belongs to the admin account.
    pub fn require_admin(&self, command: &str) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::AdminRequired(command.to_string()))
        }
    }
}

/// Verify credentials against the roster and open a session.
pub fn authenticate(roster: &Roster, username: &str, password: &str) -> Result<Session> {
    let username = username.trim().to_lowercase();
    if username.is_empty() {
        return Err(Error::InvalidArgument("username cannot be empty".to_string()));
    }
    match roster.find(&username) {
        Some(user) if user.password == password => Ok(Session { username }),
        _ => Err(Error::AuthFailed(username)),
    }
}
