//! Validation and resolution of config + flags into run settings.
//!
//! Every problem is collected before failing so the user can fix them all
//! in one go.

use std::sync::LazyLock;

use anyhow::{Result, bail};
use chrono::{Datelike, Months, NaiveDate};
use chrono_tz::Tz;
use regex::Regex;
use url::Url;
use wl_core::{CalendarOptions, DateRange, IssueKey, WorkItem, WorkItems, duration};

use crate::Config;
use crate::cli::{PlanArgs, RangeArgs};

static LOGIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z]{2,24}$").unwrap());

const MAX_HOURS: u32 = 8;

/// Everything needed to build the calendar.
#[derive(Debug, Clone)]
pub struct CalendarSettings {
    pub range: DateRange,
    pub local_calendar: bool,
    pub day_status_url: String,
    pub holidays: Vec<NaiveDate>,
    pub options: CalendarOptions,
}

/// Calendar settings plus what the plan and submission need.
#[derive(Debug, Clone)]
pub struct PlanSettings {
    pub calendar: CalendarSettings,
    pub target_secs: i64,
    pub items: WorkItems,
    pub jira: JiraSettings,
}

#[derive(Clone)]
pub struct JiraSettings {
    pub url: String,
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for JiraSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraSettings")
            .field("url", &self.url)
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Default)]
struct Problems(Vec<String>);

impl Problems {
    fn push(&mut self, problem: impl Into<String>) {
        self.0.push(problem.into());
    }

    fn finish(self) -> Result<()> {
        if self.0.is_empty() {
            return Ok(());
        }
        bail!("invalid input:\n- {}", self.0.join("\n- "))
    }
}

/// Resolve the calendar part only.
pub fn resolve_calendar(config: &Config, args: &RangeArgs, today: NaiveDate) -> Result<CalendarSettings> {
    let mut problems = Problems::default();
    let calendar = calendar_settings(config, args, today, &mut problems);
    problems.finish()?;
    calendar.ok_or_else(|| anyhow::anyhow!("invalid date range"))
}

/// Resolve everything `plan` and `log` need.
pub fn resolve_plan(config: &Config, args: &PlanArgs, today: NaiveDate) -> Result<PlanSettings> {
    let mut problems = Problems::default();
    let calendar = calendar_settings(config, &args.range, today, &mut problems);

    if !is_http_url(&config.jira_url) {
        problems.push(format!(
            "jira_url must be an http(s) URL such as https://jira.example.com/, got {:?}",
            config.jira_url
        ));
    }
    if !LOGIN_RE.is_match(&config.login) {
        problems.push(format!(
            "login must be 2-24 latin letters, got {:?}",
            config.login
        ));
    }
    let password = config.password.clone().unwrap_or_default();
    if password.is_empty() {
        problems.push("password is not set (use WL_PASSWORD or run from a terminal)");
    }

    let hours = args.hours.unwrap_or(config.hours);
    let minutes = args.minutes.unwrap_or(config.minutes);
    if hours > MAX_HOURS {
        problems.push(format!("hours must be in 0-{MAX_HOURS}, got {hours}"));
    }
    if minutes > 59 {
        problems.push(format!("minutes must be in 0-59, got {minutes}"));
    }

    let items = work_items(config, args, &mut problems);

    problems.finish()?;
    let (Some(calendar), Some(items)) = (calendar, items) else {
        bail!("invalid input");
    };

    Ok(PlanSettings {
        calendar,
        target_secs: duration::hm_to_secs(i64::from(hours), i64::from(minutes)),
        items,
        jira: JiraSettings {
            url: config.jira_url.clone(),
            login: config.login.clone(),
            password,
        },
    })
}

fn calendar_settings(
    config: &Config,
    args: &RangeArgs,
    today: NaiveDate,
    problems: &mut Problems,
) -> Option<CalendarSettings> {
    let year = args.year.or(config.year).unwrap_or_else(|| today.year());
    let month = args.month.or(config.month).unwrap_or_else(|| today.month());
    let first_day = args.first_day.unwrap_or(config.first_day);
    let last_day = args.last_day.or(config.last_day);

    let mut ok = true;
    if year < today.year() - 1 || year > today.year() {
        problems.push(format!(
            "year must be the current or previous year, got {year}"
        ));
        ok = false;
    }
    if !(1..=12).contains(&month) {
        problems.push(format!("month must be in 1-12, got {month}"));
        ok = false;
    }
    if !(1..=31).contains(&first_day) {
        problems.push(format!("first_day must be in 1-31, got {first_day}"));
        ok = false;
    }
    if let Some(last) = last_day.filter(|d| !(1..=31).contains(d)) {
        problems.push(format!("last_day must be in 1-31, got {last}"));
        ok = false;
    }

    let timezone = match config.timezone.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(err) => {
            problems.push(format!("unknown timezone {:?}: {err}", config.timezone));
            None
        }
    };

    if !ok {
        return None;
    }

    let Some(start) = NaiveDate::from_ymd_opt(year, month, first_day) else {
        problems.push(format!("{year}-{month:02} has no day {first_day}"));
        return None;
    };
    let end = match last_day {
        Some(day) => NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
            problems.push(format!("{year}-{month:02} has no day {day}"));
            None
        })?,
        None => last_day_of_month(start)?,
    };
    let range = match DateRange::new(start, end) {
        Ok(range) => range,
        Err(err) => {
            problems.push(err.to_string());
            return None;
        }
    };

    Some(CalendarSettings {
        range,
        local_calendar: args.local_calendar || config.local_calendar,
        day_status_url: config.day_status_url.clone(),
        holidays: config.holidays.clone(),
        options: CalendarOptions {
            timezone: timezone?,
            locale: config.locale,
        },
    })
}

/// An absolute `http`/`https` URL with a host.
fn is_http_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

fn work_items(config: &Config, args: &PlanArgs, problems: &mut Problems) -> Option<WorkItems> {
    let raw: Vec<(String, Option<String>)> = if args.issues.is_empty() {
        config
            .issues
            .iter()
            .map(|issue| (issue.key.clone(), issue.comment.clone()))
            .collect()
    } else {
        args.issues
            .iter()
            .map(String::as_str)
            .map(parse_issue_arg)
            .collect()
    };
    let nothing_configured = raw.is_empty();

    let mut items = Vec::with_capacity(raw.len());
    for (key, comment) in raw {
        match IssueKey::new(key) {
            Ok(key) => items.push(WorkItem::new(key, comment)),
            Err(err) => problems.push(err.to_string()),
        }
    }

    match WorkItems::new(items) {
        Ok(items) => Some(items),
        Err(err) => {
            // Invalid keys were already reported one by one.
            if nothing_configured {
                problems.push(format!("{err}: configure issues or pass --issue"));
            }
            None
        }
    }
}

/// Split `KEY:comment` into key and optional comment.
fn parse_issue_arg(arg: &str) -> (String, Option<String>) {
    match arg.split_once(':') {
        Some((key, comment)) => (key.trim().to_string(), Some(comment.trim().to_string())),
        None => (arg.trim().to_string(), None),
    }
}
