//! Work-time allocation engine.
//!
//! This crate contains the logic for filling a worklog:
//! - Classification: deciding whether a date is a workday, cut day, or day off
//! - Calendar: expanding a date range into working days with entry anchors
//! - Reconciliation: capping each day's budget by time already logged
//! - Allocation: splitting each day's budget across work items

mod allocation;
pub mod calendar;
pub mod classify;
pub mod day;
pub mod duration;
mod reconcile;
mod types;

pub use allocation::{AllocationEntry, WorklogSink, allocate, split_day, submit_entries};
pub use calendar::{
    AnchorSource, Calendar, CalendarOptions, FixedAnchor, RandomAnchor, build_calendar,
};
pub use classify::{
    ClassifyError, DayClassifier, DayLookup, LocalCalendar, LookupError, RemoteClassifier,
    RetryPolicy, Sleeper, ThreadSleeper,
};
pub use day::{DateRange, DayStatus, InvalidDateRange, Locale, WorkingDay};
pub use reconcile::{
    LoggedDay, LoggedTime, OvertimeAnomaly, Reconciliation, logged_time_or_empty, reconcile,
    remaining_budget,
};
pub use types::{IssueKey, ValidationError, WorkItem, WorkItems};
