//! taskman report commands: generate, show.
//!
//! Both are admin-only. `generate` writes the fixed-width overview files;
//! `show` prints the same statistics without touching disk.

use std::path::PathBuf;

use chrono::{Local, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::report::{self, TaskOverview, UserOverview};

// =============================================================================
// report generate
// =============================================================================

pub struct GenerateOptions {
    pub data_dir: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct GenerateReport {
    task_overview_file: PathBuf,
    user_overview_file: PathBuf,
    task_overview: TaskOverview,
    user_overview: UserOverview,
}

pub fn run_generate(opts: GenerateOptions) -> Result<()> {
    let ctx = super::load_context(opts.data_dir, opts.user, opts.password)?;
    ctx.session.require_admin("report generate")?;

    let tasks = ctx.store.load_tasks()?;
    let today = Local::now().date_naive();
    let generated_at = Utc::now();

    let task_overview = report::task_overview(&tasks, today, generated_at);
    let user_overview = report::user_overview(&tasks, &ctx.roster, today, generated_at);

    ctx.store.write_task_overview(&task_overview.render())?;
    ctx.store.write_user_overview(&user_overview.render())?;

    tracing::debug!(tasks = tasks.len(), users = ctx.roster.len(), "reports generated");

    let report = GenerateReport {
        task_overview_file: ctx.store.task_overview_path(),
        user_overview_file: ctx.store.user_overview_path(),
        task_overview,
        user_overview,
    };

    let mut human = HumanOutput::new("taskman report generate: reports written");
    human.push_summary(
        "task overview",
        report.task_overview_file.display().to_string(),
    );
    human.push_summary(
        "user overview",
        report.user_overview_file.display().to_string(),
    );
    if report.task_overview.total_tasks == 0 {
        human.push_warning("there are currently no tasks; totals are all zero".to_string());
    }
    human.push_next_step("taskman report show".to_string());

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "report generate",
        &report,
        Some(&human),
    )?;

    Ok(())
}

// =============================================================================
// report show
// =============================================================================

pub struct ShowOptions {
    pub data_dir: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ShowReport {
    task_overview: TaskOverview,
    user_overview: UserOverview,
}

pub fn run_show(opts: ShowOptions) -> Result<()> {
    let ctx = super::load_context(opts.data_dir, opts.user, opts.password)?;
    ctx.session.require_admin("report show")?;

    let tasks = ctx.store.load_tasks()?;
    let today = Local::now().date_naive();
    let generated_at = Utc::now();

    let report = ShowReport {
        task_overview: report::task_overview(&tasks, today, generated_at),
        user_overview: report::user_overview(&tasks, &ctx.roster, today, generated_at),
    };

    if opts.json {
        return emit_success(
            OutputOptions {
                json: true,
                quiet: opts.quiet,
            },
            "report show",
            &report,
            None,
        );
    }

    // The rendered blocks are the output; no summary wrapper.
    if !opts.quiet {
        println!("{}", report.task_overview.render());
        println!("{}", report.user_overview.render());
    }

    Ok(())
}
