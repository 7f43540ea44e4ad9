//! Days command: show how each date in the range is classified.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use wl_core::{Calendar, DayStatus, Locale, RandomAnchor, build_calendar, duration::format_secs};

use crate::Config;
use crate::cli::RangeArgs;
use crate::commands::classifier_for;
use crate::settings::resolve_calendar;

pub fn run<W: Write>(writer: &mut W, config: &Config, args: &RangeArgs, today: NaiveDate) -> Result<()> {
    let settings = resolve_calendar(config, args, today)?;
    let classifier = classifier_for(&settings)?;
    let calendar = build_calendar(
        settings.range,
        classifier.as_ref(),
        &mut RandomAnchor,
        &settings.options,
    )
    .context("failed to classify days")?;

    writeln!(writer, "Calendar for {}", settings.range)?;
    render_calendar(writer, &calendar, settings.options.locale)
}

fn status_name(status: DayStatus) -> &'static str {
    match status {
        DayStatus::WorkDay => "workday",
        DayStatus::CutDay => "cut day",
        DayStatus::DayOff => "day off",
    }
}

pub fn render_calendar<W: Write>(writer: &mut W, calendar: &Calendar, locale: Locale) -> Result<()> {
    if calendar.days.is_empty() {
        writeln!(writer, "No working days.")?;
    }
    for day in &calendar.days {
        writeln!(
            writer,
            "{:<18}{:<10}{:>4}",
            locale.day_label(day.date),
            status_name(day.status),
            format_secs(day.capacity_secs())
        )?;
    }

    let capacity: i64 = calendar.days.iter().map(|day| day.capacity_secs()).sum();
    writeln!(
        writer,
        "Working days: {}, capacity {}",
        calendar.days.len(),
        format_secs(capacity)
    )?;
    if !calendar.days_off.is_empty() {
        let days_off = calendar
            .days_off
            .iter()
            .map(|date| locale.day_label(*date))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(writer, "Days off: {days_off}")?;
    }
    Ok(())
}
