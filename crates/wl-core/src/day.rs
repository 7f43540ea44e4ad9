//! Day classifications, date ranges, and the working-day record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a standard full workday in seconds.
pub const FULL_WORKDAY_SECS: i64 = 28_800;

/// Nominal capacity of a shortened pre-holiday workday.
pub const CUT_DAY_SECS: i64 = 25_200;

/// How a single calendar date counts for work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayStatus {
    WorkDay,
    DayOff,
    CutDay,
}

impl DayStatus {
    /// Seconds of work the day can hold.
    pub const fn capacity_secs(self) -> i64 {
        match self {
            Self::WorkDay => FULL_WORKDAY_SECS,
            Self::DayOff => 0,
            Self::CutDay => CUT_DAY_SECS,
        }
    }

    /// Single-character code used by the day-status lookup service.
    pub const fn code(self) -> &'static str {
        match self {
            Self::WorkDay => "0",
            Self::DayOff => "1",
            Self::CutDay => "2",
        }
    }

    pub const fn is_day_off(self) -> bool {
        matches!(self, Self::DayOff)
    }

    pub const fn is_cut(self) -> bool {
        matches!(self, Self::CutDay)
    }
}

/// A day-status code outside `{"0", "1", "2"}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown day status code: {0:?}")]
pub struct UnknownDayCode(pub String);

impl FromStr for DayStatus {
    type Err = UnknownDayCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Self::WorkDay),
            "1" => Ok(Self::DayOff),
            "2" => Ok(Self::CutDay),
            _ => Err(UnknownDayCode(s.to_string())),
        }
    }
}

/// Start date after end date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date range: {start} is after {end}")]
pub struct InvalidDateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// An inclusive, ordered range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidDateRange> {
        if start > end {
            return Err(InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the range, in calendar order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        std::iter::successors(Some(self.start), |d| d.checked_add_days(Days::new(1)))
            .take_while(move |d| *d <= end)
    }

    /// Calendar years the range touches.
    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start.year()..=self.end.year()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%d.%m.%Y"),
            self.end.format("%d.%m.%Y")
        )
    }
}

/// Language for weekday names in progress records and rendered plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub const fn weekday(self, weekday: Weekday) -> &'static str {
        match (self, weekday) {
            (Self::En, Weekday::Mon) => "Monday",
            (Self::En, Weekday::Tue) => "Tuesday",
            (Self::En, Weekday::Wed) => "Wednesday",
            (Self::En, Weekday::Thu) => "Thursday",
            (Self::En, Weekday::Fri) => "Friday",
            (Self::En, Weekday::Sat) => "Saturday",
            (Self::En, Weekday::Sun) => "Sunday",
            (Self::Ru, Weekday::Mon) => "понедельник",
            (Self::Ru, Weekday::Tue) => "вторник",
            (Self::Ru, Weekday::Wed) => "среда",
            (Self::Ru, Weekday::Thu) => "четверг",
            (Self::Ru, Weekday::Fri) => "пятница",
            (Self::Ru, Weekday::Sat) => "суббота",
            (Self::Ru, Weekday::Sun) => "воскресенье",
        }
    }

    /// `Monday 02.03` style label.
    pub fn day_label(self, date: NaiveDate) -> String {
        format!("{} {}", self.weekday(date.weekday()), date.format("%d.%m"))
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// A date that can take work, with the budget the run will spend on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDay {
    pub date: NaiveDate,
    pub status: DayStatus,
    /// Time of day log entries for this date are stamped with.
    pub anchor: DateTime<Tz>,
    /// Seconds to distribute; zero until reconciled.
    pub allocated_secs: i64,
}

impl WorkingDay {
    pub const fn capacity_secs(&self) -> i64 {
        self.status.capacity_secs()
    }
}
