//! Day-status lookup service client.
//!
//! `GET {base}/{YYYYMMDD}?pre=1` answers with a single character:
//! `0` workday, `1` day off, `2` shortened pre-holiday day.

use chrono::NaiveDate;
use wl_core::{DayLookup, DayStatus, LookupError};

use crate::{TrackerError, build_http};

pub const DEFAULT_DAY_STATUS_URL: &str = "https://isdayoff.ru";

/// Single-attempt lookups; wrap in `wl_core::RemoteClassifier` for retries.
#[derive(Debug)]
pub struct DayStatusClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl DayStatusClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TrackerError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http: build_http()?,
            base_url,
        })
    }

    fn url_for(&self, date: NaiveDate) -> String {
        format!("{}/{}", self.base_url, date.format("%Y%m%d"))
    }
}

impl DayLookup for DayStatusClient {
    fn lookup(&self, date: NaiveDate) -> Result<DayStatus, LookupError> {
        let url = self.url_for(date);
        let response = self
            .http
            .get(&url)
            .query(&[("pre", "1")])
            .send()
            .map_err(|err| LookupError::Transport(format!("request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Transport(format!("{url} returned status {status}")));
        }

        let body = response
            .text()
            .map_err(|err| LookupError::Transport(format!("failed to read {url}: {err}")))?;
        body.parse::<DayStatus>()
            .map_err(|_| LookupError::InvalidResponse(body))
    }
}
