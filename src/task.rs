//! Task records and status transitions.
//!
//! Tasks are persisted one per line in `tasks.txt`, fields joined by `;`:
//! `id;assigned_to;assigned_by;title;description;due_date;date_assigned;status`
//! with dates in `DD/MM/YYYY` and status as the literal `Yes`/`No`. Records
//! written by the legacy program carry no leading id field; the loader
//! accepts them and assigns a fresh id.

use std::collections::HashSet;

use chrono::{Months, NaiveDate};
use serde::Serialize;
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::roster::Roster;

/// Input and storage date format, e.g. `01/12/2023`
pub const DATE_FORMAT: &str = "%d/%m/%Y";
/// Display date format, e.g. `01 Dec 2023`
pub const DATE_FORMAT_DISPLAY: &str = "%d %b %Y";

const TITLE_MIN: usize = 5;
const TITLE_MAX: usize = 30;
const DESCRIPTION_MIN: usize = 5;
const DESCRIPTION_MAX: usize = 1000;
const MAX_MONTHS_AHEAD: u32 = 18;

const ID_PREFIX: &str = "task";
const ID_SUFFIX_LEN: usize = 4;
const STATUS_COMPLETE: &str = "Yes";
const STATUS_INCOMPLETE: &str = "No";

/// A single tracked task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: String,
    pub assigned_to: String,
    pub assigned_by: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub date_assigned: NaiveDate,
    pub completed: bool,
}

impl Task {
    /// Create a new task, validating title, description, and due-date range.
    pub fn new(
        id: String,
        assigned_to: impl Into<String>,
        assigned_by: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self> {
        let title = title.into();
        let description = description.into();
        validate_title(&title)?;
        validate_description(&description)?;
        validate_due_date(due_date, today)?;

        Ok(Self {
            id,
            assigned_to: assigned_to.into(),
            assigned_by: assigned_by.into(),
            title,
            description,
            due_date,
            date_assigned: today,
            completed: false,
        })
    }

    /// Mark this task as complete. Completed tasks are immutable, so a
    /// second call fails.
    pub fn complete(&mut self) -> Result<()> {
        if self.completed {
            return Err(Error::AlreadyCompleted(self.id.clone()));
        }
        self.completed = true;
        Ok(())
    }

    /// Hand this task to another user. The new assignee must exist in the
    /// roster, and the acting user becomes the assigner.
    pub fn reassign(&mut self, new_assignee: &str, acting_user: &str, roster: &Roster) -> Result<()> {
        if self.completed {
            return Err(Error::AlreadyCompleted(self.id.clone()));
        }
        let new_assignee = new_assignee.trim().to_lowercase();
        if !roster.exists(&new_assignee) {
            return Err(Error::UnknownUser(new_assignee));
        }
        self.assigned_to = new_assignee;
        self.assigned_by = acting_user.to_string();
        Ok(())
    }

    /// Move the due date. The new date must be today or later and no more
    /// than 18 months ahead.
    pub fn reschedule(&mut self, new_due: NaiveDate, today: NaiveDate) -> Result<()> {
        if self.completed {
            return Err(Error::AlreadyCompleted(self.id.clone()));
        }
        validate_due_date(new_due, today)?;
        self.due_date = new_due;
        Ok(())
    }

    /// Whether this task is past due and still open.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date < today
    }

    /// Signed day count until the due date (negative when past due).
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    /// Parse a persisted record line. Legacy 7-field records (no id) are
    /// returned with an empty id for the loader to fill in.
    pub fn parse_record(line: &str) -> std::result::Result<Task, String> {
        let fields: Vec<&str> = line.split(';').collect();
        let (id, rest) = match fields.len() {
            8 => (fields[0].to_string(), &fields[1..]),
            7 => (String::new(), &fields[..]),
            n => return Err(format!("expected 7 or 8 fields, found {n}")),
        };

        let due_date = parse_record_date(rest[4], "due date")?;
        let date_assigned = parse_record_date(rest[5], "date assigned")?;
        let completed = match rest[6] {
            STATUS_COMPLETE => true,
            STATUS_INCOMPLETE => false,
            other => return Err(format!("invalid status '{other}': expected Yes or No")),
        };

        Ok(Task {
            id,
            assigned_to: rest[0].to_string(),
            assigned_by: rest[1].to_string(),
            title: rest[2].to_string(),
            description: rest[3].to_string(),
            due_date,
            date_assigned,
            completed,
        })
    }

    /// Render this task as a persisted record line.
    pub fn to_record(&self) -> String {
        format!(
            "{};{};{};{};{};{};{};{}",
            self.id,
            self.assigned_to,
            self.assigned_by,
            self.title,
            self.description,
            self.due_date.format(DATE_FORMAT),
            self.date_assigned.format(DATE_FORMAT),
            if self.completed {
                STATUS_COMPLETE
            } else {
                STATUS_INCOMPLETE
            }
        )
    }
}

fn parse_record_date(value: &str, field: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| format!("invalid {field} '{value}': expected DD/MM/YYYY"))
}

/// Parse a user-supplied `DD/MM/YYYY` date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| Error::InvalidFormat(input.trim().to_string()))
}

/// Check that a due date is today or later and at most 18 months ahead.
pub fn validate_due_date(due: NaiveDate, today: NaiveDate) -> Result<()> {
    if due < today {
        return Err(Error::InvalidDateRange(format!(
            "{} is in the past",
            due.format(DATE_FORMAT)
        )));
    }
    let limit = max_due_date(today);
    if due > limit {
        return Err(Error::InvalidDateRange(format!(
            "{} is more than {} months ahead (limit {})",
            due.format(DATE_FORMAT),
            MAX_MONTHS_AHEAD,
            limit.format(DATE_FORMAT)
        )));
    }
    Ok(())
}

fn max_due_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_months(Months::new(MAX_MONTHS_AHEAD))
        .unwrap_or(NaiveDate::MAX)
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }
    let len = title.chars().count();
    if !(TITLE_MIN..=TITLE_MAX).contains(&len) {
        return Err(Error::InvalidArgument(format!(
            "title must be {TITLE_MIN} to {TITLE_MAX} characters"
        )));
    }
    validate_record_text(title, "title")
}

fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "description cannot be empty".to_string(),
        ));
    }
    let len = description.chars().count();
    if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&len) {
        return Err(Error::InvalidArgument(format!(
            "description must be {DESCRIPTION_MIN} to {DESCRIPTION_MAX} characters"
        )));
    }
    validate_record_text(description, "description")
}

// Records are one `;`-joined line each, so the delimiter and line breaks
// would make the saved file unreadable.
fn validate_record_text(value: &str, field: &str) -> Result<()> {
    if value.contains(';') || value.contains('\n') || value.contains('\r') {
        return Err(Error::InvalidArgument(format!(
            "{field} cannot contain ';' or line breaks"
        )));
    }
    Ok(())
}

/// Generate a short unique task id from the random section of a ULID.
pub fn generate_id(existing: &HashSet<String>) -> String {
    loop {
        let base = Ulid::new().to_string().to_lowercase();
        let suffix = &base[base.len() - ID_SUFFIX_LEN..];
        let id = format!("{ID_PREFIX}-{suffix}");
        if !existing.contains(&id) {
            return id;
        }
    }
}

/// Resolve a task id or unambiguous suffix prefix to an index in `tasks`.
pub fn resolve_task(tasks: &[Task], input: &str) -> Result<usize> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
    }

    let mut matches: Vec<usize> = Vec::new();
    for (index, task) in tasks.iter().enumerate() {
        let id = task.id.to_lowercase();
        if id == needle {
            return Ok(index);
        }
        let suffix = id.strip_prefix(&format!("{ID_PREFIX}-")).unwrap_or(&id);
        if suffix.starts_with(&needle) {
            matches.push(index);
        }
    }

    match matches.len() {
        0 => Err(Error::TaskNotFound(needle)),
        1 => Ok(matches[0]),
        _ => Err(Error::InvalidArgument(format!(
            "ambiguous task id '{}': {}",
            needle,
            matches
                .iter()
                .map(|&i| tasks[i].id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}
