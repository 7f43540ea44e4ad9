//! Calendar, reconciliation and allocation run together over one week.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use insta::assert_snapshot;
use wl_core::{
    CalendarOptions, ClassifyError, DateRange, DayClassifier, DayStatus, FixedAnchor, IssueKey,
    Locale, LoggedTime, WorkItem, WorkItems, allocate, build_calendar, reconcile,
};

struct Scripted(HashMap<NaiveDate, DayStatus>);

impl DayClassifier for Scripted {
    fn classify(&self, date: NaiveDate) -> Result<DayStatus, ClassifyError> {
        Ok(self.0.get(&date).copied().unwrap_or(DayStatus::DayOff))
    }
}

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

#[test]
fn test_week_is_topped_up_around_existing_worklogs() {
    let classifier = Scripted(HashMap::from([
        (march(2), DayStatus::WorkDay),
        (march(3), DayStatus::CutDay),
        (march(4), DayStatus::WorkDay),
        (march(5), DayStatus::WorkDay),
        (march(6), DayStatus::CutDay),
    ]));
    let options = CalendarOptions::default();
    let range = DateRange::new(march(2), march(8)).unwrap();
    let mut anchors = FixedAnchor(NaiveTime::from_hms_opt(12, 0, 0).unwrap());

    let calendar = build_calendar(range, &classifier, &mut anchors, &options).unwrap();
    assert_eq!(calendar.days.len(), 5);
    assert_eq!(calendar.days_off, vec![march(7), march(8)]);

    let mut logged = LoggedTime::new();
    logged.entry(march(4)).or_default().add("OPS-9", 28_800);
    logged.entry(march(5)).or_default().add("OPS-9", 3_600);
    logged.entry(march(6)).or_default().add("OPS-9", 30_000);

    let reconciliation = reconcile(calendar.days, &logged, 28_800, Locale::En);
    assert_eq!(
        reconciliation
            .overtime
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec!["2026-03-06:8h 20m"]
    );

    let items = WorkItems::new(vec![
        WorkItem::new(IssueKey::new("ABC-1").unwrap(), Some("dev".to_string())),
        WorkItem::new(IssueKey::new("ABC-2").unwrap(), None),
    ])
    .unwrap();
    let entries = allocate(&reconciliation.days, &items, Locale::En);

    let listing = entries
        .iter()
        .map(|entry| format!("{} {}", entry.started.to_rfc3339(), entry.label()))
        .collect::<Vec<_>>()
        .join("\n");
    assert_snapshot!(listing, @r"
    2026-03-02T12:00:00+03:00 ABC-1 dev-4h
    2026-03-02T12:00:00+03:00 ABC-2-4h
    2026-03-03T12:00:00+03:00 ABC-1 dev-3h
    2026-03-03T12:00:00+03:00 ABC-2-4h
    2026-03-05T12:00:00+03:00 ABC-1 dev-3h
    2026-03-05T12:00:00+03:00 ABC-2-4h
    ");
}
