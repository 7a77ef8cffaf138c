//! tasktrack report command implementations

use chrono::Local;

use crate::cli::{Access, Session};
use crate::error::Result;
use crate::output::{emit_success, format_human, HumanOutput, OutputOptions};
use crate::report::{render_task_overview, render_user_overview};
use crate::stats::{self, Reports};

pub fn run_generate(access: Access, output: OutputOptions) -> Result<()> {
    let session = Session::open(access)?;
    session.require_admin("generate reports")?;

    let reports = stats::generate(
        &session.tasks(),
        &session.users(),
        &session.reports(),
        Local::now().naive_local(),
    )?;

    let mut human = HumanOutput::new("Reports generated");
    human.push_summary("tasks", reports.task_overview.total.to_string());
    human.push_summary("users", reports.user_overview.user_count.to_string());
    human.push_summary(
        "written",
        format!(
            "{}, {}",
            session.config.files.task_overview, session.config.files.user_overview
        ),
    );
    human.push_next_step("tasktrack report show");

    emit_success(output, "report generate", &reports, Some(&human))
}

pub fn run_show(access: Access, output: OutputOptions) -> Result<()> {
    let session = Session::open(access)?;
    session.require_admin("view reports")?;

    let store = session.reports();
    let reports = Reports {
        task_overview: store.read_task_overview()?,
        user_overview: store.read_user_overview()?,
    };

    emit_success(output, "report show", &reports, None)?;
    if !output.json && !output.quiet {
        println!(
            "{}\n\n{}",
            format_human(&render_task_overview(&reports.task_overview)),
            format_human(&render_user_overview(&reports.user_overview))
        );
    }
    Ok(())
}
