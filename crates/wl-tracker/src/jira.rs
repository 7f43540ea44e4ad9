//! Jira worklog access.
//!
//! Existing worklogs are found in two steps: the timesheet report lists the
//! issues the user logged time on, then each issue's worklogs are read and
//! filtered to the user and date range.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use wl_core::{AllocationEntry, DateRange, LoggedTime, WorklogSink};

use crate::{TrackerError, build_http};

const TIMESHEET_PATH: &str = "/secure/TimesheetReport.jspa";
const STARTED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Issue links in the timesheet report.
static ISSUE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="[^"]*/browse/([A-Za-z][A-Za-z0-9_]*-[0-9]+)""#).unwrap()
});

/// Jira REST client using basic authentication.
pub struct JiraClient {
    http: reqwest::blocking::Client,
    base_url: String,
    login: String,
    password: String,
}

impl fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraClient")
            .field("base_url", &self.base_url)
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorklogPage {
    worklogs: Vec<Worklog>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Worklog {
    author: Author,
    started: String,
    time_spent_seconds: i64,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewWorklog<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    started: String,
    time_spent_seconds: i64,
}

impl JiraClient {
    pub fn new(
        base_url: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, TrackerError> {
        Ok(Self {
            http: build_http()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            login: login.into(),
            password: password.into(),
        })
    }

    /// Time `user` already logged per date within `range`.
    pub fn fetch_logged_time(
        &self,
        user: &str,
        range: DateRange,
    ) -> Result<LoggedTime, TrackerError> {
        let user = user.to_lowercase();
        let issues = self.timesheet_issues(&user, range)?;
        tracing::debug!(count = issues.len(), "issues with logged time");

        let mut logged = LoggedTime::new();
        for issue in issues {
            let worklogs = self.issue_worklogs(&issue)?;
            collect_worklogs(&mut logged, &issue, worklogs, &user, range);
        }
        Ok(logged)
    }

    fn timesheet_issues(&self, user: &str, range: DateRange) -> Result<Vec<String>, TrackerError> {
        let url = format!("{}{TIMESHEET_PATH}", self.base_url);
        let start = range.start().format("%Y-%m-%d").to_string();
        let end = range.end().format("%Y-%m-%d").to_string();
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.login, Some(&self.password))
            .query(&[
                ("reportKey", "jira-timesheet-plugin:report"),
                ("reportingDay", "0"),
                ("startDate", start.as_str()),
                ("endDate", end.as_str()),
                ("sum", "day"),
                ("moreFields", "assignee"),
                ("targetUser", user),
            ])
            .send()?;

        let html = success_body(&url, response)?;
        Ok(extract_issue_keys(&html))
    }

    fn issue_worklogs(&self, issue: &str) -> Result<Vec<Worklog>, TrackerError> {
        let url = format!("{}/rest/api/2/issue/{issue}/worklog", self.base_url);
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.login, Some(&self.password))
            .send()?;

        let body = success_body(&url, response)?;
        let page: WorklogPage = serde_json::from_str(&body)
            .map_err(|err| TrackerError::InvalidResponse(format!("{url}: {err}")))?;
        Ok(page.worklogs)
    }

    /// Record one worklog.
    pub fn add_worklog(&self, entry: &AllocationEntry) -> Result<(), TrackerError> {
        let url = format!("{}/rest/api/2/issue/{}/worklog", self.base_url, entry.issue);
        let payload = new_worklog(entry);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.login, Some(&self.password))
            .json(&payload)
            .send()?;

        success_body(&url, response)?;
        Ok(())
    }
}

impl WorklogSink for JiraClient {
    type Error = TrackerError;

    fn submit(&self, entry: &AllocationEntry) -> Result<(), Self::Error> {
        self.add_worklog(entry)
    }
}

fn success_body(url: &str, response: reqwest::blocking::Response) -> Result<String, TrackerError> {
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        return Err(TrackerError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

fn new_worklog(entry: &AllocationEntry) -> NewWorklog<'_> {
    NewWorklog {
        comment: entry.comment.as_deref(),
        started: entry.started.format(STARTED_FORMAT).to_string(),
        time_spent_seconds: entry.duration_secs,
    }
}

/// Unique issue keys linked from a timesheet report, in page order.
pub fn extract_issue_keys(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    ISSUE_LINK_RE
        .captures_iter(html)
        .map(|caps| caps[1].to_string())
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

fn collect_worklogs(
    logged: &mut LoggedTime,
    issue: &str,
    worklogs: Vec<Worklog>,
    user: &str,
    range: DateRange,
) {
    for worklog in worklogs {
        if !worklog.author.name.eq_ignore_ascii_case(user) {
            continue;
        }
        let Some(date) = started_date(&worklog.started) else {
            tracing::warn!(issue, started = %worklog.started, "skipping worklog with unparseable start");
            continue;
        };
        if range.contains(date) {
            logged
                .entry(date)
                .or_default()
                .add(issue, worklog.time_spent_seconds);
        }
    }
}

fn started_date(started: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(started.get(..10)?, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use wl_core::{CalendarOptions, IssueKey};

    use super::*;

    fn query(pairs: &[(&str, &str)]) -> Matcher {
        Matcher::AllOf(
            pairs
                .iter()
                .map(|(k, v)| Matcher::UrlEncoded((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn march_range() -> DateRange {
        DateRange::new(date(2), date(6)).unwrap()
    }

    const TIMESHEET_HTML: &str = r#"
        <table>
          <tr><td>1</td><td>x</td><td><a href="/browse/ABC-1">ABC-1</a></td></tr>
          <tr><td>2</td><td>y</td><td><a href="https://jira.example.com/browse/XYZ-22">XYZ-22</a></td></tr>
          <tr><td>3</td><td>z</td><td><a href="/browse/ABC-1">ABC-1</a></td></tr>
          <tr><td><a href="/secure/ViewProfile.jspa?name=jdoe">jdoe</a></td></tr>
        </table>
    "#;

    #[test]
    fn extract_issue_keys_dedupes_in_order() {
        assert_eq!(extract_issue_keys(TIMESHEET_HTML), vec!["ABC-1", "XYZ-22"]);
        assert!(extract_issue_keys("<html></html>").is_empty());
    }

    #[test]
    fn started_date_uses_leading_iso_date() {
        assert_eq!(started_date("2026-03-02T10:00:00.000+0300"), Some(date(2)));
        assert_eq!(started_date("garbage"), None);
        assert_eq!(started_date(""), None);
    }

    #[test]
    fn collect_worklogs_filters_user_and_range() {
        let body = r#"{"startAt":0,"total":4,"worklogs":[
            {"author":{"name":"JDoe"},"started":"2026-03-02T10:00:00.000+0300","timeSpentSeconds":3600},
            {"author":{"name":"jdoe"},"started":"2026-03-02T15:00:00.000+0300","timeSpentSeconds":1800},
            {"author":{"name":"other"},"started":"2026-03-02T10:00:00.000+0300","timeSpentSeconds":7200},
            {"author":{"name":"jdoe"},"started":"2026-03-09T10:00:00.000+0300","timeSpentSeconds":7200}
        ]}"#;
        let page: WorklogPage = serde_json::from_str(body).unwrap();

        let mut logged = LoggedTime::new();
        collect_worklogs(&mut logged, "ABC-1", page.worklogs, "jdoe", march_range());

        assert_eq!(logged.len(), 1);
        let day = &logged[&date(2)];
        assert_eq!(day.total_secs, 5_400);
        assert_eq!(day.breakdown, vec!["ABC-1-1h", "ABC-1-30m"]);
    }

    fn entry(comment: Option<&str>) -> AllocationEntry {
        AllocationEntry {
            issue: IssueKey::new("ABC-1").unwrap(),
            comment: comment.map(str::to_string),
            date: date(2),
            started: CalendarOptions::default()
                .localize(date(2), NaiveTime::from_hms_opt(14, 5, 9).unwrap()),
            duration_secs: 14_400,
        }
    }

    #[test]
    fn new_worklog_payload_shape() {
        let json = serde_json::to_string(&new_worklog(&entry(Some("review")))).unwrap();
        assert_eq!(
            json,
            r#"{"comment":"review","started":"2026-03-02T14:05:09.000+0300","timeSpentSeconds":14400}"#
        );

        let json = serde_json::to_string(&new_worklog(&entry(None))).unwrap();
        assert!(!json.contains("comment"));
    }

    #[test]
    fn client_debug_redacts_password() {
        let client = JiraClient::new("https://jira.example.com", "jdoe", "hunter2").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn fetch_logged_time_reads_timesheet_then_worklogs() {
        let mut server = Server::new();
        let timesheet = server
            .mock("GET", TIMESHEET_PATH)
            .match_query(query(&[
                ("reportKey", "jira-timesheet-plugin:report"),
                ("startDate", "2026-03-02"),
                ("endDate", "2026-03-06"),
                ("targetUser", "jdoe"),
            ]))
            .match_header("authorization", "Basic SkRvZTpzZWNyZXQ=")
            .with_status(200)
            .with_body(r#"<a href="/browse/ABC-1">ABC-1</a>"#)
            .expect(1)
            .create();
        let worklogs = server
            .mock("GET", "/rest/api/2/issue/ABC-1/worklog")
            .match_header("authorization", "Basic SkRvZTpzZWNyZXQ=")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"worklogs":[
                    {"author":{"name":"jdoe"},"started":"2026-03-03T11:00:00.000+0300","timeSpentSeconds":7200}
                ]}"#,
            )
            .expect(1)
            .create();
        let client = JiraClient::new(server.url(), "JDoe", "secret").unwrap();

        let logged = client.fetch_logged_time("JDoe", march_range()).unwrap();
        assert_eq!(logged[&date(3)].total_secs, 7_200);
        assert_eq!(logged[&date(3)].breakdown, vec!["ABC-1-2h"]);
        timesheet.assert();
        worklogs.assert();
    }

    #[test]
    fn fetch_logged_time_non_success_is_error() {
        let mut server = Server::new();
        let timesheet = server
            .mock("GET", TIMESHEET_PATH)
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("Unauthorized")
            .expect(1)
            .create();
        let client = JiraClient::new(server.url(), "jdoe", "wrong").unwrap();

        let err = client.fetch_logged_time("jdoe", march_range()).unwrap_err();
        assert!(matches!(err, TrackerError::Status { status: 401, .. }));
        timesheet.assert();
    }

    #[test]
    fn add_worklog_posts_payload() {
        let mut server = Server::new();
        let post = server
            .mock("POST", "/rest/api/2/issue/ABC-1/worklog")
            .match_header("authorization", "Basic amRvZTpzZWNyZXQ=")
            .match_body(Matcher::Json(json!({
                "comment": "review",
                "started": "2026-03-02T14:05:09.000+0300",
                "timeSpentSeconds": 14400,
            })))
            .with_status(201)
            .with_body("{}")
            .expect(1)
            .create();
        let client = JiraClient::new(server.url(), "jdoe", "secret").unwrap();

        client.submit(&entry(Some("review"))).unwrap();
        post.assert();
    }

    #[test]
    fn add_worklog_rejected_is_error() {
        let mut server = Server::new();
        let post = server
            .mock("POST", "/rest/api/2/issue/ABC-1/worklog")
            .with_status(400)
            .with_body("bad worklog")
            .create();
        let client = JiraClient::new(server.url(), "jdoe", "secret").unwrap();

        let err = client.submit(&entry(None)).unwrap_err();
        assert!(matches!(err, TrackerError::Status { status: 400, .. }));
        post.assert();
    }
}
