//! taskman task commands: add, list, complete, reassign, reschedule.
//!
//! Every mutation loads the task file, applies the change in memory, and
//! rewrites the file before reporting success.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::filter::{self, TaskFilter, TaskScope};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::session::Session;
use crate::task::{self, Task, DATE_FORMAT, DATE_FORMAT_DISPLAY};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Mutations are scoped to the task's assignee; admin may act on any task.
fn require_assignee(task: &Task, session: &Session) -> Result<()> {
    if session.is_admin() || task.assigned_to == session.username() {
        Ok(())
    } else {
        Err(Error::NotAssignee(task.id.clone()))
    }
}

/// Row shape shared by list and mutation output.
#[derive(Serialize)]
struct TaskRow {
    id: String,
    assigned_to: String,
    assigned_by: String,
    title: String,
    due_date: String,
    date_assigned: String,
    completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    orphaned_assigner: Option<bool>,
}

impl TaskRow {
    fn from_task(task: &Task, roster: &crate::roster::Roster) -> Self {
        let orphaned = !roster.exists(&task.assigned_by);
        Self {
            id: task.id.clone(),
            assigned_to: task.assigned_to.clone(),
            assigned_by: task.assigned_by.clone(),
            title: task.title.clone(),
            due_date: task.due_date.format(DATE_FORMAT).to_string(),
            date_assigned: task.date_assigned.format(DATE_FORMAT).to_string(),
            completed: task.completed,
            orphaned_assigner: orphaned.then_some(true),
        }
    }
}

fn describe(task: &Task, roster: &crate::roster::Roster, today: NaiveDate) -> String {
    let status = if task.completed { "done" } else { "open" };
    let assigner = if roster.exists(&task.assigned_by) {
        task.assigned_by.clone()
    } else {
        format!("{} [deleted user]", task.assigned_by)
    };
    let mut line = format!(
        "{} [{}] {} (to: {}, by: {}, due {})",
        task.id,
        status,
        task.title,
        task.assigned_to,
        assigner,
        task.due_date.format(DATE_FORMAT_DISPLAY),
    );
    if let Some(annotation) = filter::due_annotation(task, today) {
        line.push(' ');
        line.push_str(&annotation);
    }
    line
}

// =============================================================================
// task add
// =============================================================================

pub struct AddOptions {
    pub assigned_to: String,
    pub title: String,
    pub description: String,
    pub due: String,
    pub data_dir: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_add(opts: AddOptions) -> Result<()> {
    let ctx = super::load_context(opts.data_dir, opts.user, opts.password)?;

    let assigned_to = opts.assigned_to.trim().to_lowercase();
    if !ctx.roster.exists(&assigned_to) {
        return Err(Error::UnknownUser(assigned_to));
    }

    let due = task::parse_date(&opts.due)?;
    let today = today();

    let mut tasks = ctx.store.load_tasks()?;
    let existing: HashSet<String> = tasks.iter().map(|task| task.id.clone()).collect();
    let id = task::generate_id(&existing);

    let task = Task::new(
        id,
        assigned_to,
        ctx.session.username(),
        opts.title,
        opts.description,
        due,
        today,
    )?;
    tasks.push(task.clone());
    ctx.store.save_tasks(&tasks)?;

    tracing::debug!(id = %task.id, assigned_to = %task.assigned_to, "task added");

    let mut human = HumanOutput::new(format!("taskman task add: created {}", task.id));
    human.push_summary("assigned to", task.assigned_to.clone());
    human.push_summary("due", task.due_date.format(DATE_FORMAT_DISPLAY).to_string());
    human.push_next_step(format!("taskman task complete {}", task.id));

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "task add",
        &TaskRow::from_task(&task, &ctx.roster),
        Some(&human),
    )?;

    Ok(())
}

// =============================================================================
// task list
// =============================================================================

pub struct ListOptions {
    pub filter: Option<String>,
    pub everyone: bool,
    pub data_dir: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ListReport {
    filter: &'static str,
    scope: &'static str,
    count: usize,
    tasks: Vec<TaskRow>,
}

pub fn run_list(opts: ListOptions) -> Result<()> {
    let ctx = super::load_context(opts.data_dir, opts.user, opts.password)?;

    let today = today();
    let selector = TaskFilter::parse(opts.filter.as_deref());
    let scope = if opts.everyone {
        TaskScope::Everyone
    } else {
        TaskScope::Mine(ctx.session.username())
    };

    let tasks = ctx.store.load_tasks()?;
    let visible = filter::filter_tasks(&tasks, scope, selector, today, &ctx.roster);

    let report = ListReport {
        filter: selector.label(),
        scope: if opts.everyone { "everyone" } else { "mine" },
        count: visible.len(),
        tasks: visible
            .iter()
            .map(|task| TaskRow::from_task(task, &ctx.roster))
            .collect(),
    };

    let mut human = HumanOutput::new(format!("{} ({})", selector.label(), report.count));
    if visible.is_empty() {
        human.push_detail("no matching tasks".to_string());
    }
    for task in &visible {
        human.push_detail(describe(task, &ctx.roster, today));
    }

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "task list",
        &report,
        Some(&human),
    )?;

    Ok(())
}

// =============================================================================
// task complete
// =============================================================================

pub struct CompleteOptions {
    pub id: String,
    pub data_dir: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_complete(opts: CompleteOptions) -> Result<()> {
    let ctx = super::load_context(opts.data_dir, opts.user, opts.password)?;

    let mut tasks = ctx.store.load_tasks()?;
    let index = task::resolve_task(&tasks, &opts.id)?;
    require_assignee(&tasks[index], &ctx.session)?;
    tasks[index].complete()?;
    ctx.store.save_tasks(&tasks)?;

    let task = &tasks[index];
    tracing::debug!(id = %task.id, "task completed");

    let mut human = HumanOutput::new(format!("taskman task complete: {} done", task.id));
    human.push_summary("title", task.title.clone());

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "task complete",
        &TaskRow::from_task(task, &ctx.roster),
        Some(&human),
    )?;

    Ok(())
}

// =============================================================================
// task reassign
// =============================================================================

pub struct ReassignOptions {
    pub id: String,
    pub assigned_to: String,
    pub data_dir: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_reassign(opts: ReassignOptions) -> Result<()> {
    let ctx = super::load_context(opts.data_dir, opts.user, opts.password)?;

    let mut tasks = ctx.store.load_tasks()?;
    let index = task::resolve_task(&tasks, &opts.id)?;
    require_assignee(&tasks[index], &ctx.session)?;
    tasks[index].reassign(&opts.assigned_to, ctx.session.username(), &ctx.roster)?;
    ctx.store.save_tasks(&tasks)?;

    let task = &tasks[index];
    tracing::debug!(id = %task.id, assigned_to = %task.assigned_to, "task reassigned");

    let mut human = HumanOutput::new(format!(
        "taskman task reassign: {} now assigned to {}",
        task.id, task.assigned_to
    ));
    human.push_summary("assigned by", task.assigned_by.clone());

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "task reassign",
        &TaskRow::from_task(task, &ctx.roster),
        Some(&human),
    )?;

    Ok(())
}

// =============================================================================
// task reschedule
// =============================================================================

pub struct RescheduleOptions {
    pub id: String,
    pub due: String,
    pub data_dir: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_reschedule(opts: RescheduleOptions) -> Result<()> {
    let ctx = super::load_context(opts.data_dir, opts.user, opts.password)?;

    let due = task::parse_date(&opts.due)?;
    let today = today();

    let mut tasks = ctx.store.load_tasks()?;
    let index = task::resolve_task(&tasks, &opts.id)?;
    require_assignee(&tasks[index], &ctx.session)?;
    tasks[index].reschedule(due, today)?;
    ctx.store.save_tasks(&tasks)?;

    let task = &tasks[index];
    tracing::debug!(id = %task.id, due = %task.due_date, "task rescheduled");

    let human = HumanOutput::new(format!(
        "taskman task reschedule: {} due {}",
        task.id,
        task.due_date.format(DATE_FORMAT_DISPLAY)
    ));

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "task reschedule",
        &TaskRow::from_task(task, &ctx.roster),
        Some(&human),
    )?;

    Ok(())
}
