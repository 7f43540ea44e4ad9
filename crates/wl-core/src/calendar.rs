//! Expands a date range into classified working days.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use rand::Rng;

use crate::classify::{ClassifyError, DayClassifier};
use crate::day::{DateRange, DayStatus, Locale, WorkingDay};

/// Earliest and latest hour an anchor may fall in (inclusive).
const ANCHOR_FIRST_HOUR: u32 = 11;
const ANCHOR_LAST_HOUR: u32 = 20;

/// Supplies the time of day a working day's entries are stamped with.
pub trait AnchorSource {
    fn next_anchor(&mut self) -> NaiveTime;
}

/// Uniformly random anchors in `11:00:00..=20:59:59`, drawn from the thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAnchor;

impl AnchorSource for RandomAnchor {
    fn next_anchor(&mut self) -> NaiveTime {
        let mut rng = rand::thread_rng();
        let hour = rng.gen_range(ANCHOR_FIRST_HOUR..=ANCHOR_LAST_HOUR);
        let minute = rng.gen_range(0..=59);
        let second = rng.gen_range(0..=59);
        NaiveTime::from_hms_opt(hour, minute, second).unwrap_or(NaiveTime::MIN)
    }
}

/// Always returns the same time.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnchor(pub NaiveTime);

impl AnchorSource for FixedAnchor {
    fn next_anchor(&mut self) -> NaiveTime {
        self.0
    }
}

/// Timezone and locale for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarOptions {
    pub timezone: Tz,
    pub locale: Locale,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Moscow,
            locale: Locale::default(),
        }
    }
}

impl CalendarOptions {
    /// Localize a wall-clock time, resolving DST folds to the earlier instant.
    pub fn localize(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
        let naive = date.and_time(time);
        self.timezone
            .from_local_datetime(&naive)
            .earliest()
            .unwrap_or_else(|| self.timezone.from_utc_datetime(&naive))
    }
}

/// Classified range: working days in order plus the dates skipped as days off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    pub days: Vec<WorkingDay>,
    pub days_off: Vec<NaiveDate>,
}

impl Calendar {
    pub fn cut_days(&self) -> impl Iterator<Item = &WorkingDay> {
        self.days.iter().filter(|day| day.status.is_cut())
    }
}

/// Classify every date in `range` and keep those that can take work.
///
/// Stops at the first classification error; no partial calendar is returned.
pub fn build_calendar(
    range: DateRange,
    classifier: &dyn DayClassifier,
    anchors: &mut dyn AnchorSource,
    options: &CalendarOptions,
) -> Result<Calendar, ClassifyError> {
    tracing::info!(timezone = %options.timezone, "building calendar for {range}");

    let mut days = Vec::new();
    let mut days_off = Vec::new();

    for date in range.dates() {
        let status = classifier.classify(date)?;
        if status == DayStatus::DayOff {
            days_off.push(date);
            continue;
        }
        days.push(WorkingDay {
            date,
            status,
            anchor: options.localize(date, anchors.next_anchor()),
            allocated_secs: 0,
        });
    }

    let calendar = Calendar { days, days_off };
    log_calendar(&calendar, options.locale);
    Ok(calendar)
}

fn join_labels(dates: impl Iterator<Item = NaiveDate>, locale: Locale) -> String {
    dates
        .map(|date| locale.day_label(date))
        .collect::<Vec<_>>()
        .join(", ")
}

fn log_calendar(calendar: &Calendar, locale: Locale) {
    tracing::info!(
        "working days: {}",
        join_labels(calendar.days.iter().map(|d| d.date), locale)
    );
    if calendar.cut_days().next().is_some() {
        tracing::info!(
            "cut (pre-holiday) days: {}",
            join_labels(calendar.cut_days().map(|d| d.date), locale)
        );
    }
    if !calendar.days_off.is_empty() {
        tracing::info!(
            "days off: {}",
            join_labels(calendar.days_off.iter().copied(), locale)
        );
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Timelike;

    use super::*;
    use crate::classify::LocalCalendar;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon() -> FixedAnchor {
        FixedAnchor(NaiveTime::from_hms_opt(12, 0, 0).unwrap())
    }

    struct MapClassifier(HashMap<NaiveDate, DayStatus>);

    impl DayClassifier for MapClassifier {
        fn classify(&self, date: NaiveDate) -> Result<DayStatus, ClassifyError> {
            self.0
                .get(&date)
                .copied()
                .ok_or(ClassifyError::Exhausted {
                    date,
                    attempts: 3,
                    reason: "unreachable".to_string(),
                })
        }
    }

    #[test]
    fn test_build_calendar_skips_days_off() {
        // Mon 2026-03-02 .. Sun 2026-03-08, Mar 8 is both Sunday and a holiday.
        let range = DateRange::new(date(2026, 3, 2), date(2026, 3, 8)).unwrap();
        let classifier = LocalCalendar::with_public_holidays(range.years());
        let calendar =
            build_calendar(range, &classifier, &mut noon(), &CalendarOptions::default()).unwrap();

        let dates: Vec<_> = calendar.days.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            (2..=6).map(|d| date(2026, 3, d)).collect::<Vec<_>>()
        );
        assert_eq!(calendar.days_off, vec![date(2026, 3, 7), date(2026, 3, 8)]);
        assert!(calendar.days.iter().all(|d| d.allocated_secs == 0));
        assert!(calendar.days.iter().all(|d| d.status == DayStatus::WorkDay));
    }

    #[test]
    fn test_build_calendar_keeps_cut_days() {
        let range = DateRange::new(date(2026, 3, 5), date(2026, 3, 6)).unwrap();
        let classifier = MapClassifier(HashMap::from([
            (date(2026, 3, 5), DayStatus::WorkDay),
            (date(2026, 3, 6), DayStatus::CutDay),
        ]));
        let calendar =
            build_calendar(range, &classifier, &mut noon(), &CalendarOptions::default()).unwrap();

        assert_eq!(calendar.days.len(), 2);
        let cut: Vec<_> = calendar.cut_days().map(|d| d.date).collect();
        assert_eq!(cut, vec![date(2026, 3, 6)]);
        assert_eq!(calendar.days[1].capacity_secs(), 25_200);
    }

    #[test]
    fn test_build_calendar_fails_without_partial_result() {
        let range = DateRange::new(date(2026, 3, 2), date(2026, 3, 4)).unwrap();
        let classifier = MapClassifier(HashMap::from([(date(2026, 3, 2), DayStatus::WorkDay)]));
        let err = build_calendar(range, &classifier, &mut noon(), &CalendarOptions::default())
            .unwrap_err();
        assert!(matches!(err, ClassifyError::Exhausted { date: d, .. } if d == date(2026, 3, 3)));
    }

    #[test]
    fn test_anchor_is_localized_in_configured_timezone() {
        let range = DateRange::new(date(2026, 3, 2), date(2026, 3, 2)).unwrap();
        let options = CalendarOptions {
            timezone: chrono_tz::Europe::Moscow,
            locale: Locale::Ru,
        };
        let calendar =
            build_calendar(range, &LocalCalendar::default(), &mut noon(), &options).unwrap();
        let anchor = calendar.days[0].anchor;
        assert_eq!(anchor.to_rfc3339(), "2026-03-02T12:00:00+03:00");
    }

    #[test]
    fn test_random_anchor_stays_in_window() {
        let mut anchors = RandomAnchor;
        for _ in 0..500 {
            let t = anchors.next_anchor();
            assert!((11..=20).contains(&t.hour()), "hour out of window: {t}");
            assert!(t.minute() <= 59);
            assert!(t.second() <= 59);
        }
    }

    #[test]
    fn test_random_anchors_differ_across_working_days() {
        // Mon 2026-03-02 .. Fri 2026-03-27: four full weeks, Mar 8 falls on a Sunday.
        let range = DateRange::new(date(2026, 3, 2), date(2026, 3, 27)).unwrap();
        let classifier = LocalCalendar::with_public_holidays(range.years());
        let calendar = build_calendar(
            range,
            &classifier,
            &mut RandomAnchor,
            &CalendarOptions::default(),
        )
        .unwrap();
        assert_eq!(calendar.days.len(), 20);

        let times: Vec<NaiveTime> = calendar.days.iter().map(|d| d.anchor.time()).collect();
        assert!(
            times.iter().any(|t| *t != times[0]),
            "every working day got the same anchor: {}",
            times[0]
        );
        assert!(times.iter().all(|t| (11..=20).contains(&t.hour())));
    }

    #[test]
    fn test_localize_skips_dst_gap() {
        // 02:30 does not exist in Berlin on 2026-03-29.
        let options = CalendarOptions {
            timezone: chrono_tz::Europe::Berlin,
            locale: Locale::En,
        };
        let t = NaiveTime::from_hms_opt(2, 30, 0).unwrap();
        let localized = options.localize(date(2026, 3, 29), t);
        assert_eq!(localized.date_naive(), date(2026, 3, 29));
    }
}
