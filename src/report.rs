//! Report aggregation over the task and user stores.
//!
//! Two derived summaries: a task overview (totals, completion and overdue
//! ratios) and a user overview (per-user shares and ratios). Both are pure
//! computations over loaded state; rendering to the fixed-width text files is
//! a separate step so the numbers can also go out as JSON.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::roster::Roster;
use crate::task::Task;

const LINE_WIDTH: usize = 45;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Collection-wide totals and ratios.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOverview {
    pub generated_at: DateTime<Utc>,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub incomplete_tasks: usize,
    pub overdue_tasks: usize,
    pub incomplete_pct: f64,
    pub overdue_pct: f64,
}

/// Per-user slice of the collection.
#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub username: String,
    pub tasks_assigned: usize,
    pub share_of_total_pct: f64,
    pub completed_pct: f64,
    pub incomplete_pct: f64,
    pub overdue_pct: f64,
}

/// Roster-wide statistics, one entry per registered user in roster order.
#[derive(Debug, Clone, Serialize)]
pub struct UserOverview {
    pub generated_at: DateTime<Utc>,
    pub total_users: usize,
    pub total_tasks: usize,
    pub users: Vec<UserStats>,
}

/// Percentage of `part` in `whole`; an empty denominator reports 0 rather
/// than an error or NaN.
fn ratio_pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

fn overdue(task: &Task, today: NaiveDate) -> bool {
    !task.completed && task.due_date < today
}

/// Aggregate the task overview.
pub fn task_overview(tasks: &[Task], today: NaiveDate, generated_at: DateTime<Utc>) -> TaskOverview {
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|task| task.completed).count();
    let incomplete_tasks = total_tasks - completed_tasks;
    let overdue_tasks = tasks.iter().filter(|task| overdue(task, today)).count();

    TaskOverview {
        generated_at,
        total_tasks,
        completed_tasks,
        incomplete_tasks,
        overdue_tasks,
        incomplete_pct: ratio_pct(incomplete_tasks, total_tasks),
        overdue_pct: ratio_pct(overdue_tasks, total_tasks),
    }
}

/// Aggregate the user overview. Every registered user appears, including
/// those with no tasks; their ratios are all zero.
pub fn user_overview(
    tasks: &[Task],
    roster: &Roster,
    today: NaiveDate,
    generated_at: DateTime<Utc>,
) -> UserOverview {
    let total_tasks = tasks.len();
    let users = roster
        .users()
        .iter()
        .map(|user| {
            let assigned: Vec<&Task> = tasks
                .iter()
                .filter(|task| task.assigned_to == user.username)
                .collect();
            let total = assigned.len();
            let completed = assigned.iter().filter(|task| task.completed).count();
            let incomplete = total - completed;
            let past_due = assigned.iter().filter(|task| overdue(task, today)).count();

            UserStats {
                username: user.username.clone(),
                tasks_assigned: total,
                share_of_total_pct: ratio_pct(total, total_tasks),
                completed_pct: ratio_pct(completed, total),
                incomplete_pct: ratio_pct(incomplete, total),
                overdue_pct: ratio_pct(past_due, total),
            }
        })
        .collect();

    UserOverview {
        generated_at,
        total_users: roster.len(),
        total_tasks,
        users,
    }
}

impl TaskOverview {
    /// Render the fixed-width text written to `task_overview.txt`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "           Task Overview Report");
        let _ = writeln!(out, "{}", "=".repeat(LINE_WIDTH));
        let _ = writeln!(
            out,
            "Date Report Generated: {}\n",
            self.generated_at.format(TIMESTAMP_FORMAT)
        );
        let _ = writeln!(out, "{:<20}{}", "Total Tasks:", self.total_tasks);
        let _ = writeln!(out, "{:<20}{}", "Completed Tasks:", self.completed_tasks);
        let _ = writeln!(out, "{:<20}{}", "Incomplete Tasks:", self.incomplete_tasks);
        let _ = writeln!(out, "{:<20}{}", "Overdue Tasks:", self.overdue_tasks);
        let _ = writeln!(out, "{:<20}{:.2} %", "% Incomplete Tasks:", self.incomplete_pct);
        let _ = writeln!(out, "{:<20}{:.2} %\n\n", "% Overdue Tasks:", self.overdue_pct);
        out
    }
}

impl UserOverview {
    /// Render the fixed-width text written to `user_overview.txt`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "           User Overview Report");
        let _ = writeln!(out, "{}", "=".repeat(LINE_WIDTH));
        let _ = writeln!(
            out,
            "Date Report Generated: {}\n",
            self.generated_at.format(TIMESTAMP_FORMAT)
        );
        let _ = writeln!(out, "{:<15}{}", "Total Users:", self.total_users);
        let _ = writeln!(out, "{:<15}{}\n", "Total Tasks:", self.total_tasks);

        for stats in &self.users {
            let _ = writeln!(out, "{:<18}{}", "Username:", stats.username);
            let _ = writeln!(
                out,
                "{:<18}{} ({:.2} % of total)",
                "Tasks Assigned:", stats.tasks_assigned, stats.share_of_total_pct
            );
            let _ = writeln!(out, "{:<18}{:.2} %", "% Completed:", stats.completed_pct);
            let _ = writeln!(out, "{:<18}{:.2} %", "% Incomplete:", stats.incomplete_pct);
            let _ = writeln!(out, "{:<18}{:.2} %", "% Overdue:", stats.overdue_pct);
            let _ = writeln!(out, "{}", "-".repeat(LINE_WIDTH));
        }
        out
    }
}
