//! Budget reconciliation against time already logged in the tracker.
//!
//! For each working day the run may spend at most what the day has left:
//!
//! | already logged               | allocated            |
//! |------------------------------|----------------------|
//! | `>= capacity`                | 0                    |
//! | `capacity - already < target`| `capacity - already` |
//! | otherwise                    | `target`             |
//!
//! Independently, any date with more than a full workday logged is reported
//! as an [`OvertimeAnomaly`], even when its own capacity is lower.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use crate::day::{FULL_WORKDAY_SECS, Locale, WorkingDay};
use crate::duration::format_secs;

/// Time already recorded for one date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggedDay {
    pub total_secs: i64,
    /// `KEY-duration` entries, one per existing worklog.
    pub breakdown: Vec<String>,
}

impl LoggedDay {
    pub fn add(&mut self, issue: &str, secs: i64) {
        self.total_secs += secs;
        self.breakdown.push(format!("{issue}-{}", format_secs(secs)));
    }
}

/// Already-logged time by date. A missing date means nothing was logged.
pub type LoggedTime = BTreeMap<NaiveDate, LoggedDay>;

/// A date whose logged time exceeds a full workday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OvertimeAnomaly {
    pub date: NaiveDate,
    pub logged_secs: i64,
}

impl fmt::Display for OvertimeAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.date, format_secs(self.logged_secs))
    }
}

/// Reconciled days plus the overtime anomalies that need acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub days: Vec<WorkingDay>,
    pub overtime: Vec<OvertimeAnomaly>,
}

impl Reconciliation {
    pub fn has_overtime(&self) -> bool {
        !self.overtime.is_empty()
    }
}

/// Seconds the run may log on a day with `capacity` and `already` logged.
pub const fn remaining_budget(capacity: i64, already: i64, target: i64) -> i64 {
    if already >= capacity {
        0
    } else if capacity - already < target {
        capacity - already
    } else {
        target
    }
}

/// Whether `logged` seconds on one date counts as overtime.
pub const fn is_overtime(logged: i64) -> bool {
    logged > FULL_WORKDAY_SECS
}

/// Set each day's `allocated_secs` and collect overtime anomalies.
pub fn reconcile(
    mut days: Vec<WorkingDay>,
    logged: &LoggedTime,
    target_secs: i64,
    locale: Locale,
) -> Reconciliation {
    tracing::info!("adjusting planned time for already logged work");
    let mut overtime = Vec::new();

    for day in &mut days {
        let existing = logged.get(&day.date);
        let already = existing.map_or(0, |l| l.total_secs);

        if is_overtime(already) {
            overtime.push(OvertimeAnomaly {
                date: day.date,
                logged_secs: already,
            });
        }

        day.allocated_secs = remaining_budget(day.capacity_secs(), already, target_secs);

        let worklog = existing
            .filter(|l| !l.breakdown.is_empty())
            .map_or_else(|| "empty".to_string(), |l| l.breakdown.join(", "));
        tracing::info!(
            "{}: available {}, current worklog {worklog}",
            locale.day_label(day.date),
            format_secs(day.allocated_secs),
        );
    }

    if !overtime.is_empty() {
        let dates = overtime
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        tracing::warn!("logged time exceeds a full workday on: {dates}");
    }

    Reconciliation { days, overtime }
}

/// Turn a failed logged-time read into "nothing logged yet".
pub fn logged_time_or_empty<E: fmt::Display>(result: Result<LoggedTime, E>) -> LoggedTime {
    result.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to read existing worklog, assuming nothing is logged");
        LoggedTime::new()
    })
}
