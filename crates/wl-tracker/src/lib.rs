//! Remote collaborators for worklog filling.
//!
//! Provides:
//! - A day-status lookup client (`isdayoff.ru`-compatible)
//! - A Jira client for reading existing worklogs and submitting new ones

use std::time::Duration;

use thiserror::Error;

mod isdayoff;
mod jira;

pub use isdayoff::{DEFAULT_DAY_STATUS_URL, DayStatusClient};
pub use jira::{JiraClient, extract_issue_keys};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tracker client errors.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("{url} returned status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

fn build_http() -> Result<reqwest::blocking::Client, TrackerError> {
    reqwest::blocking::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .map_err(TrackerError::ClientBuild)
}
