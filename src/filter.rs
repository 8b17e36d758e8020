//! Filtered views over the task collection.
//!
//! Pure functions from (tasks, scope, selector, today, roster) to a narrowed
//! sequence plus a display label. No mutation, safe to re-run after a
//! cancelled selection.

use chrono::NaiveDate;

use crate::roster::Roster;
use crate::task::Task;

/// Filter selector, chosen per viewing session and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    Incomplete,
    Completed,
    Overdue,
    Orphaned,
    All,
}

impl TaskFilter {
    /// Parse a selector. Unrecognized input means "no filter" rather than an
    /// error, so parsing is total. The numeric aliases match the menu options
    /// of the legacy program.
    pub fn parse(input: Option<&str>) -> Self {
        match input.map(|value| value.trim().to_lowercase()).as_deref() {
            Some("incomplete" | "1") => TaskFilter::Incomplete,
            Some("completed" | "2") => TaskFilter::Completed,
            Some("overdue" | "3") => TaskFilter::Overdue,
            Some("orphaned" | "4") => TaskFilter::Orphaned,
            _ => TaskFilter::All,
        }
    }

    /// Human-readable filter label.
    pub fn label(&self) -> &'static str {
        match self {
            TaskFilter::Incomplete => "Incompleted tasks",
            TaskFilter::Completed => "Completed tasks",
            TaskFilter::Overdue => "Overdue tasks",
            TaskFilter::Orphaned => "Tasks assigned by users that no longer exist",
            TaskFilter::All => "All tasks",
        }
    }
}

/// Whose tasks to view: the current user's, or everyone's.
#[derive(Debug, Clone, Copy)]
pub enum TaskScope<'a> {
    Mine(&'a str),
    Everyone,
}

/// Derive the filtered view. Returns borrowed tasks in store order.
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    scope: TaskScope<'_>,
    filter: TaskFilter,
    today: NaiveDate,
    roster: &Roster,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| match scope {
            TaskScope::Mine(username) => task.assigned_to == username,
            TaskScope::Everyone => true,
        })
        .filter(|task| match filter {
            TaskFilter::Incomplete => !task.completed,
            TaskFilter::Completed => task.completed,
            TaskFilter::Overdue => task.is_overdue(today),
            TaskFilter::Orphaned => !roster.exists(&task.assigned_by),
            TaskFilter::All => true,
        })
        .collect()
}

/// Display annotation for an open task's due date: `[due in N days]` ahead of
/// the due date, `[-N days overdue]` past it, nothing on the day itself or
/// once completed.
pub fn due_annotation(task: &Task, today: NaiveDate) -> Option<String> {
    if task.completed {
        return None;
    }
    let remaining = task.days_until_due(today);
    if task.due_date < today {
        Some(format!("[{remaining} days overdue]"))
    } else if task.due_date > today {
        Some(format!("[due in {remaining} days]"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::User;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    fn roster() -> Roster {
        Roster::from_vec(vec![
            User {
                username: "admin".to_string(),
                password: "password".to_string(),
            },
            User {
                username: "alice".to_string(),
                password: "Alice123".to_string(),
            },
        ])
    }

    fn task(id: &str, to: &str, by: &str, due: NaiveDate, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            assigned_to: to.to_string(),
            assigned_by: by.to_string(),
            title: "Review PR".to_string(),
            description: "Look over the open pull request".to_string(),
            due_date: due,
            date_assigned: due - Duration::days(7),
            completed,
        }
    }

    #[test]
    fn selector_parsing_is_total() {
        assert_eq!(TaskFilter::parse(Some("incomplete")), TaskFilter::Incomplete);
        assert_eq!(TaskFilter::parse(Some("1")), TaskFilter::Incomplete);
        assert_eq!(TaskFilter::parse(Some("Completed")), TaskFilter::Completed);
        assert_eq!(TaskFilter::parse(Some("overdue")), TaskFilter::Overdue);
        assert_eq!(TaskFilter::parse(Some("orphaned")), TaskFilter::Orphaned);
        assert_eq!(TaskFilter::parse(Some("all")), TaskFilter::All);
        // Unrecognized input selects no filter, not an error.
        assert_eq!(TaskFilter::parse(Some("bogus")), TaskFilter::All);
        assert_eq!(TaskFilter::parse(Some("")), TaskFilter::All);
        assert_eq!(TaskFilter::parse(None), TaskFilter::All);
    }

    #[test]
    fn overdue_moves_with_today() {
        let today = date(2026, 1, 15);
        let tasks = vec![task(
            "task-aa11",
            "alice",
            "admin",
            today + Duration::days(3),
            false,
        )];
        let roster = roster();

        let overdue = filter_tasks(&tasks, TaskScope::Mine("alice"), TaskFilter::Overdue, today, &roster);
        assert!(overdue.is_empty());

        let incomplete = filter_tasks(
            &tasks,
            TaskScope::Mine("alice"),
            TaskFilter::Incomplete,
            today,
            &roster,
        );
        assert_eq!(incomplete.len(), 1);

        // Advancing today past the due date moves the task into Overdue.
        let later = today + Duration::days(4);
        let overdue = filter_tasks(&tasks, TaskScope::Mine("alice"), TaskFilter::Overdue, later, &roster);
        assert_eq!(overdue.len(), 1);
    }

    #[test]
    fn overdue_is_subset_of_incomplete() {
        let today = date(2026, 1, 15);
        let tasks = vec![
            task("task-aa11", "alice", "admin", today - Duration::days(2), false),
            task("task-bb22", "alice", "admin", today + Duration::days(2), false),
            task("task-cc33", "alice", "admin", today - Duration::days(5), true),
        ];
        let roster = roster();

        let overdue = filter_tasks(&tasks, TaskScope::Mine("alice"), TaskFilter::Overdue, today, &roster);
        let incomplete = filter_tasks(
            &tasks,
            TaskScope::Mine("alice"),
            TaskFilter::Incomplete,
            today,
            &roster,
        );
        for task in &overdue {
            assert!(incomplete.iter().any(|other| other.id == task.id));
        }
        assert_eq!(overdue.len(), 1);
        assert_eq!(incomplete.len(), 2);
    }

    #[test]
    fn filtering_is_pure_and_idempotent() {
        let today = date(2026, 1, 15);
        let tasks = vec![
            task("task-aa11", "alice", "admin", today, false),
            task("task-bb22", "admin", "alice", today, true),
        ];
        let roster = roster();

        let first = filter_tasks(&tasks, TaskScope::Mine("alice"), TaskFilter::All, today, &roster);
        let second = filter_tasks(&tasks, TaskScope::Mine("alice"), TaskFilter::All, today, &roster);
        assert_eq!(first, second);
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn orphaned_detects_deleted_assigners() {
        let today = date(2026, 1, 15);
        let tasks = vec![
            task("task-aa11", "alice", "admin", today, false),
            task("task-bb22", "alice", "ghostuser", today, false),
        ];
        let roster = roster();

        let orphaned = filter_tasks(&tasks, TaskScope::Mine("alice"), TaskFilter::Orphaned, today, &roster);
        assert_eq!(orphaned.len(), 1);
        assert_eq!(orphaned[0].id, "task-bb22");
    }

    #[test]
    fn everyone_scope_ignores_assignee() {
        let today = date(2026, 1, 15);
        let tasks = vec![
            task("task-aa11", "alice", "admin", today, false),
            task("task-bb22", "admin", "admin", today, false),
        ];
        let roster = roster();

        let mine = filter_tasks(&tasks, TaskScope::Mine("alice"), TaskFilter::All, today, &roster);
        assert_eq!(mine.len(), 1);

        let everyone = filter_tasks(&tasks, TaskScope::Everyone, TaskFilter::All, today, &roster);
        assert_eq!(everyone.len(), 2);
    }

    #[test]
    fn due_annotations_follow_legacy_wording() {
        let today = date(2026, 1, 15);
        let ahead = task("task-aa11", "alice", "admin", today + Duration::days(3), false);
        assert_eq!(
            due_annotation(&ahead, today).as_deref(),
            Some("[due in 3 days]")
        );

        let past = task("task-bb22", "alice", "admin", today - Duration::days(2), false);
        assert_eq!(
            due_annotation(&past, today).as_deref(),
            Some("[-2 days overdue]")
        );

        let due_today = task("task-cc33", "alice", "admin", today, false);
        assert_eq!(due_annotation(&due_today, today), None);

        let done = task("task-dd44", "alice", "admin", today - Duration::days(2), true);
        assert_eq!(due_annotation(&done, today), None);
    }
}
