//! Even distribution of each day's budget across work items.
//!
//! # Algorithm Summary
//!
//! For a day with `S` allocated seconds and `N` items:
//!
//! 1. `per_item = floor(S / 3600 / N) * 3600`, whole hours only
//! 2. `last = S - per_item * (N - 1)`, so the last item absorbs the remainder
//! 3. A day where both are zero produces no entries at all

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use crate::day::{Locale, WorkingDay};
use crate::duration::{SECS_PER_HOUR, format_secs};
use crate::types::{IssueKey, WorkItem, WorkItems};

/// A single worklog ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationEntry {
    pub issue: IssueKey,
    pub comment: Option<String>,
    pub date: NaiveDate,
    /// Start timestamp sent to the tracker.
    pub started: DateTime<Tz>,
    pub duration_secs: i64,
}

impl AllocationEntry {
    /// Empty entries are shown but never submitted.
    pub const fn is_empty(&self) -> bool {
        self.duration_secs == 0
    }

    /// Duration in `1h 26m 40s` form.
    pub fn time_spent(&self) -> String {
        format_secs(self.duration_secs)
    }

    /// `KEY comment-4h` or `KEY-4h`.
    pub fn label(&self) -> String {
        match &self.comment {
            Some(comment) => format!("{} {comment}-{}", self.issue, self.time_spent()),
            None => format!("{}-{}", self.issue, self.time_spent()),
        }
    }
}

/// Split `allocated` seconds over `items` items.
///
/// Returns `(per_item, last_item)`. `items` must be at least 1.
pub fn split_day(allocated: i64, items: usize) -> (i64, i64) {
    let n = i64::try_from(items.max(1)).unwrap_or(i64::MAX);
    let per_item = allocated / SECS_PER_HOUR / n * SECS_PER_HOUR;
    let last = allocated - per_item * (n - 1);
    (per_item, last)
}

/// Produce entries day by day, items in declaration order within a day.
pub fn allocate(days: &[WorkingDay], items: &WorkItems, locale: Locale) -> Vec<AllocationEntry> {
    tracing::info!("preparing worklog entries");
    let last_index = items.len() - 1;
    let mut entries = Vec::with_capacity(days.len() * items.len());

    for day in days {
        let (per_item, last) = split_day(day.allocated_secs, items.len());
        if per_item == 0 && last == 0 {
            continue;
        }

        let day_entries: Vec<_> = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let duration_secs = if index == last_index { last } else { per_item };
                entry_for(day, item, duration_secs)
            })
            .collect();

        let summary = day_entries
            .iter()
            .map(AllocationEntry::label)
            .collect::<Vec<_>>()
            .join(", ");
        tracing::info!("worklog for {}: {summary}", locale.day_label(day.date));

        entries.extend(day_entries);
    }

    entries
}

fn entry_for(day: &WorkingDay, item: &WorkItem, duration_secs: i64) -> AllocationEntry {
    AllocationEntry {
        issue: item.key.clone(),
        comment: item.comment.clone(),
        date: day.date,
        started: day.anchor,
        duration_secs,
    }
}

/// Receives worklogs to record in the tracker.
pub trait WorklogSink {
    type Error;

    fn submit(&self, entry: &AllocationEntry) -> Result<(), Self::Error>;
}

/// Submit every non-empty entry in order, stopping at the first failure.
///
/// Returns the number of entries submitted.
pub fn submit_entries<S: WorklogSink>(
    entries: &[AllocationEntry],
    sink: &S,
) -> Result<usize, S::Error> {
    let mut submitted = 0;
    for entry in entries.iter().filter(|e| !e.is_empty()) {
        sink.submit(entry)?;
        tracing::debug!(issue = %entry.issue, date = %entry.date, "worklog submitted");
        submitted += 1;
    }
    Ok(submitted)
}
