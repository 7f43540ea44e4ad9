//! Plan command: compute the worklog without submitting it.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use wl_core::{
    AllocationEntry, AnchorSource, DateRange, DayClassifier, Locale, LoggedTime, RandomAnchor,
    Reconciliation, allocate, build_calendar, duration::format_secs, logged_time_or_empty,
    reconcile,
};
use wl_tracker::JiraClient;

use crate::Config;
use crate::cli::PlanArgs;
use crate::commands::{classifier_for, with_terminal_password};
use crate::settings::{PlanSettings, resolve_plan};

/// Result of the classify → reconcile → allocate pipeline.
#[derive(Debug)]
pub struct Plan {
    pub range: DateRange,
    pub target_secs: i64,
    pub reconciliation: Reconciliation,
    pub entries: Vec<AllocationEntry>,
}

impl Plan {
    pub fn submittable(&self) -> impl Iterator<Item = &AllocationEntry> {
        self.entries.iter().filter(|entry| !entry.is_empty())
    }
}

/// Run the pipeline with explicit collaborators.
///
/// `fetch_logged` is called once with the span of working days; its failure
/// is logged and treated as "nothing logged".
pub fn build_plan<F, E>(
    settings: &PlanSettings,
    classifier: &dyn DayClassifier,
    anchors: &mut dyn AnchorSource,
    fetch_logged: F,
) -> Result<Plan>
where
    F: FnOnce(DateRange) -> Result<LoggedTime, E>,
    E: Display,
{
    let calendar_settings = &settings.calendar;
    let locale = calendar_settings.options.locale;
    tracing::info!(
        "planning {} per day for {} across {}",
        format_secs(settings.target_secs),
        calendar_settings.range,
        settings
            .items
            .iter()
            .map(|item| item.key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let calendar = build_calendar(
        calendar_settings.range,
        classifier,
        anchors,
        &calendar_settings.options,
    )
    .context("failed to classify days")?;

    let logged = match (calendar.days.first(), calendar.days.last()) {
        (Some(first), Some(last)) => {
            // Working days come out of the calendar sorted.
            let span = DateRange::new(first.date, last.date)?;
            logged_time_or_empty(fetch_logged(span))
        }
        _ => LoggedTime::new(),
    };

    let reconciliation = reconcile(calendar.days, &logged, settings.target_secs, locale);
    let entries = allocate(&reconciliation.days, &settings.items, locale);

    Ok(Plan {
        range: calendar_settings.range,
        target_secs: settings.target_secs,
        reconciliation,
        entries,
    })
}

/// Build a plan against the configured services.
pub fn plan_from_services(settings: &PlanSettings) -> Result<(Plan, JiraClient)> {
    let classifier = classifier_for(&settings.calendar)?;
    let jira = JiraClient::new(
        &settings.jira.url,
        &settings.jira.login,
        &settings.jira.password,
    )
    .context("failed to create Jira client")?;

    let plan = build_plan(settings, classifier.as_ref(), &mut RandomAnchor, |span| {
        jira.fetch_logged_time(&settings.jira.login, span)
    })?;
    Ok((plan, jira))
}

/// Write the plan as a table.
pub fn render_plan<W: Write>(writer: &mut W, plan: &Plan, locale: Locale) -> Result<()> {
    writeln!(
        writer,
        "Plan for {}, {} per day",
        plan.range,
        format_secs(plan.target_secs)
    )?;

    if plan.entries.is_empty() {
        writeln!(writer, "Nothing to log.")?;
    }
    let mut last_date: Option<NaiveDate> = None;
    for entry in &plan.entries {
        let day = if last_date == Some(entry.date) {
            String::new()
        } else {
            locale.day_label(entry.date)
        };
        last_date = Some(entry.date);

        let item = match &entry.comment {
            Some(comment) => format!("{} {comment}", entry.issue),
            None => entry.issue.to_string(),
        };
        let skipped = if entry.is_empty() { "  (skipped)" } else { "" };
        writeln!(
            writer,
            "{day:<18}{item:<28}{:>12}{skipped}",
            entry.time_spent(),
        )?;
    }

    let total: i64 = plan.submittable().map(|entry| entry.duration_secs).sum();
    writeln!(
        writer,
        "Total: {} in {} entries",
        format_secs(total),
        plan.submittable().count()
    )?;

    if plan.reconciliation.has_overtime() {
        let dates = plan
            .reconciliation
            .overtime
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            writer,
            "Overtime: more than a full workday is already logged on {dates}; check your worklog"
        )?;
    }
    Ok(())
}

pub fn run<W: Write>(writer: &mut W, config: &Config, args: &PlanArgs, today: NaiveDate) -> Result<()> {
    let config = with_terminal_password(config)?;
    let settings = resolve_plan(&config, args, today)?;
    let (plan, _jira) = plan_from_services(&settings)?;
    render_plan(writer, &plan, settings.calendar.options.locale)
}
