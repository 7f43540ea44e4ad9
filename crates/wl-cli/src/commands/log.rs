//! Log command: compute the worklog, confirm, and submit it.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use wl_core::{Locale, WorklogSink, submit_entries};

use crate::Config;
use crate::cli::PlanArgs;
use crate::commands::plan::{Plan, plan_from_services, render_plan};
use crate::commands::with_terminal_password;
use crate::prompt::ask_yes_no;
use crate::settings::resolve_plan;

/// What happened to a plan after confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Submitted(usize),
    NothingToSubmit,
    Declined,
}

/// Show the plan, gate on overtime and confirmation, then submit.
pub fn confirm_and_submit<R, W, S>(
    input: &mut R,
    output: &mut W,
    plan: &Plan,
    locale: Locale,
    sink: &S,
    assume_yes: bool,
) -> Result<Outcome>
where
    R: BufRead,
    W: Write,
    S: WorklogSink,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    render_plan(output, plan, locale)?;

    if plan.reconciliation.has_overtime()
        && !ask_yes_no(
            input,
            output,
            "Existing worklog exceeds a full workday on some dates. Checked it and continue?",
        )?
    {
        writeln!(output, "Stopped; nothing submitted.")?;
        return Ok(Outcome::Declined);
    }

    if plan.submittable().next().is_none() {
        writeln!(output, "Nothing to submit.")?;
        return Ok(Outcome::NothingToSubmit);
    }

    if !assume_yes && !ask_yes_no(input, output, "Submit the worklog to Jira?")? {
        writeln!(output, "OK, nothing submitted.")?;
        return Ok(Outcome::Declined);
    }

    tracing::info!("submitting worklog");
    let submitted = submit_entries(&plan.entries, sink).context("failed to submit worklog")?;
    writeln!(output, "Submitted {submitted} worklog entries.")?;
    Ok(Outcome::Submitted(submitted))
}

pub fn run<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    config: &Config,
    args: &PlanArgs,
    assume_yes: bool,
    today: NaiveDate,
) -> Result<Outcome> {
    let config = with_terminal_password(config)?;
    let settings = resolve_plan(&config, args, today)?;
    let (plan, jira) = plan_from_services(&settings)?;
    confirm_and_submit(
        input,
        output,
        &plan,
        settings.calendar.options.locale,
        &jira,
        assume_yes,
    )
}
