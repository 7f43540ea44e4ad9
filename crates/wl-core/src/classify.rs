//! Day classification strategies.
//!
//! Two interchangeable implementations of [`DayClassifier`]:
//! - [`LocalCalendar`]: weekends plus a holiday set, never fails
//! - [`RemoteClassifier`]: asks a [`DayLookup`] service, retrying transient
//!   failures under a [`RetryPolicy`]

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;

use crate::day::DayStatus;

/// Errors that make a date's status unknowable. Always fatal for a run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// Every attempt failed with a transient error.
    #[error("could not determine status for {date} after {attempts} attempts: {reason}")]
    Exhausted {
        date: NaiveDate,
        attempts: u32,
        reason: String,
    },

    /// The service answered with something other than a known code.
    #[error("invalid day status response for {date}: {body:?}")]
    InvalidResponse { date: NaiveDate, body: String },
}

/// Determines the status of a single date.
pub trait DayClassifier {
    fn classify(&self, date: NaiveDate) -> Result<DayStatus, ClassifyError>;
}

impl<C: DayClassifier + ?Sized> DayClassifier for Box<C> {
    fn classify(&self, date: NaiveDate) -> Result<DayStatus, ClassifyError> {
        (**self).classify(date)
    }
}

/// Fixed-date public holidays applied by the local rule (month, day).
const FIXED_HOLIDAYS: &[(u32, u32)] = &[
    (1, 1),
    (1, 2),
    (1, 3),
    (1, 4),
    (1, 5),
    (1, 6),
    (1, 7),
    (1, 8),
    (2, 23),
    (3, 8),
    (5, 1),
    (5, 9),
    (6, 12),
    (11, 4),
];

/// Weekday + holiday-set rule.
///
/// Saturdays, Sundays and holidays are days off, everything else is a full
/// workday. Cut days are never produced.
#[derive(Debug, Clone, Default)]
pub struct LocalCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl LocalCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// The built-in fixed-date holidays for the given years.
    pub fn with_public_holidays(years: impl IntoIterator<Item = i32>) -> Self {
        let holidays = years.into_iter().flat_map(|year| {
            FIXED_HOLIDAYS
                .iter()
                .filter_map(move |&(month, day)| NaiveDate::from_ymd_opt(year, month, day))
        });
        Self::new(holidays)
    }

    /// Add extra holiday dates.
    #[must_use]
    pub fn extend(mut self, extra: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.holidays.extend(extra);
        self
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn status(&self, date: NaiveDate) -> DayStatus {
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        if weekend || self.is_holiday(date) {
            DayStatus::DayOff
        } else {
            DayStatus::WorkDay
        }
    }
}

impl DayClassifier for LocalCalendar {
    fn classify(&self, date: NaiveDate) -> Result<DayStatus, ClassifyError> {
        Ok(self.status(date))
    }
}

/// Pauses between retry attempts.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Outcome of a single failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<E> {
    /// Worth trying again.
    Transient(E),
    /// Retrying cannot help.
    Fatal(E),
}

/// Bounded retries with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// Run `op` until it succeeds, fails fatally, or attempts run out.
    ///
    /// `op` receives the 1-based attempt number. On exhaustion the last
    /// transient error is returned along with the attempt count.
    pub fn run<T, E, F>(&self, sleeper: &dyn Sleeper, mut op: F) -> Result<T, (u32, Attempt<E>)>
    where
        F: FnMut(u32) -> Result<T, Attempt<E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(Attempt::Transient(_)) if attempt < max_attempts => {
                    sleeper.sleep(self.delay);
                    attempt += 1;
                }
                Err(err) => return Err((attempt, err)),
            }
        }
    }
}

/// A single lookup failure against a day-status service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Network error or non-success status.
    #[error("{0}")]
    Transport(String),
    /// A successful response with an unrecognized body.
    #[error("unrecognized body {0:?}")]
    InvalidResponse(String),
}

/// One request to a day-status service, without retries.
pub trait DayLookup {
    fn lookup(&self, date: NaiveDate) -> Result<DayStatus, LookupError>;
}

/// Classifies dates through a [`DayLookup`], retrying transport failures.
pub struct RemoteClassifier<L, S = ThreadSleeper> {
    lookup: L,
    policy: RetryPolicy,
    sleeper: S,
}

impl<L: DayLookup> RemoteClassifier<L> {
    pub fn new(lookup: L) -> Self {
        Self::with_policy(lookup, RetryPolicy::default(), ThreadSleeper)
    }
}

impl<L: DayLookup, S: Sleeper> RemoteClassifier<L, S> {
    pub const fn with_policy(lookup: L, policy: RetryPolicy, sleeper: S) -> Self {
        Self {
            lookup,
            policy,
            sleeper,
        }
    }
}

impl<L: DayLookup, S: Sleeper> DayClassifier for RemoteClassifier<L, S> {
    fn classify(&self, date: NaiveDate) -> Result<DayStatus, ClassifyError> {
        let result = self.policy.run(&self.sleeper, |attempt| {
            self.lookup.lookup(date).map_err(|err| match err {
                LookupError::Transport(reason) => {
                    tracing::warn!(%date, attempt, %reason, "day status lookup failed");
                    Attempt::Transient(reason)
                }
                LookupError::InvalidResponse(body) => Attempt::Fatal(body),
            })
        });

        result.map_err(|(attempts, err)| match err {
            Attempt::Transient(reason) => ClassifyError::Exhausted {
                date,
                attempts,
                reason,
            },
            Attempt::Fatal(body) => ClassifyError::InvalidResponse { date, body },
        })
    }
}
