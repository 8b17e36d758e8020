//! User roster and credential rules.
//!
//! Users are persisted one per line in `user.txt` as `username;password`.
//! Usernames are lowercase-normalized and unique; the `admin` account has
//! elevated rights and cannot be deleted.

use serde::Serialize;

use crate::error::{Error, Result};

/// The distinguished administrator account.
pub const ADMIN_USER: &str = "admin";

const USERNAME_MIN: usize = 5;
const USERNAME_MAX: usize = 15;
const PASSWORD_MIN: usize = 5;
const PASSWORD_MAX: usize = 15;

/// A single registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub username: String,
    pub password: String,
}

/// Ordered collection of registered users. Order follows the persisted file
/// and is preserved across rewrites.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    users: Vec<User>,
}

impl Roster {
    pub fn from_vec(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Whether a username exists in the roster (case-insensitive).
    pub fn exists(&self, username: &str) -> bool {
        self.find(username).is_some()
    }

    pub fn find(&self, username: &str) -> Option<&User> {
        let needle = username.trim().to_lowercase();
        self.users.iter().find(|user| user.username == needle)
    }

    /// Register a new user, returning the normalized username.
    pub fn register(&mut self, username: &str, password: &str) -> Result<String> {
        let username = validate_username(username)?;
        validate_password(password)?;
        if self.exists(&username) {
            return Err(Error::InvalidArgument(format!(
                "username '{username}' already exists"
            )));
        }
        self.users.push(User {
            username: username.clone(),
            password: password.to_string(),
        });
        Ok(username)
    }

    /// Remove a user. The admin account is protected.
    pub fn remove(&mut self, username: &str) -> Result<User> {
        let needle = username.trim().to_lowercase();
        if needle == ADMIN_USER {
            return Err(Error::ProtectedUser(needle));
        }
        let index = self
            .users
            .iter()
            .position(|user| user.username == needle)
            .ok_or(Error::UnknownUser(needle))?;
        Ok(self.users.remove(index))
    }

    /// Change a user's password after verifying the current one. The new
    /// password must satisfy the rules and differ from the current one.
    pub fn change_password(&mut self, username: &str, current: &str, new: &str) -> Result<()> {
        let needle = username.trim().to_lowercase();
        let user = self
            .users
            .iter_mut()
            .find(|user| user.username == needle)
            .ok_or_else(|| Error::UnknownUser(needle.clone()))?;
        if user.password != current {
            return Err(Error::AuthFailed(needle));
        }
        if new == current {
            return Err(Error::InvalidArgument(
                "new password cannot match the current password".to_string(),
            ));
        }
        validate_password(new)?;
        user.password = new.to_string();
        Ok(())
    }
}

/// Validate and normalize a new username: 5-15 characters, no whitespace,
/// stored lowercase.
pub fn validate_username(username: &str) -> Result<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::InvalidArgument("username cannot be empty".to_string()));
    }
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(Error::InvalidArgument(format!(
            "username must be {USERNAME_MIN} to {USERNAME_MAX} characters"
        )));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(Error::InvalidArgument(
            "username cannot contain whitespace".to_string(),
        ));
    }
    // The roster file joins username and password with ';'.
    if username.contains(';') {
        return Err(Error::InvalidArgument(
            "username cannot contain ';'".to_string(),
        ));
    }
    Ok(username.to_lowercase())
}

/// Validate a new password: 5-15 characters, no whitespace, at least one
/// uppercase letter, one lowercase letter, and one digit.
pub fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(Error::InvalidArgument("password cannot be empty".to_string()));
    }
    let len = password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(Error::InvalidArgument(format!(
            "password must be {PASSWORD_MIN} to {PASSWORD_MAX} characters"
        )));
    }
    if password.chars().any(char::is_whitespace) {
        return Err(Error::InvalidArgument(
            "password cannot contain whitespace".to_string(),
        ));
    }
    let has_upper = password.chars().any(|ch| ch.is_uppercase());
    let has_lower = password.chars().any(|ch| ch.is_lowercase());
    let has_digit = password.chars().any(|ch| ch.is_ascii_digit());
    if !(has_upper && has_lower && has_digit) {
        return Err(Error::InvalidArgument(
            "password must contain at least one uppercase letter, one lowercase letter, and one digit"
                .to_string(),
        ));
    }
    Ok(())
}
