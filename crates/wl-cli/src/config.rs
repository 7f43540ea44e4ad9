//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use wl_core::Locale;
use wl_tracker::DEFAULT_DAY_STATUS_URL;

/// A work item as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueConfig {
    pub key: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Jira server.
    pub jira_url: String,
    /// Jira login; also the user whose existing worklogs are read.
    pub login: String,
    /// Jira password. Prefer `WL_PASSWORD` over the config file.
    pub password: Option<String>,
    /// Year to fill; defaults to the current one.
    pub year: Option<i32>,
    /// Month to fill; defaults to the current one.
    pub month: Option<u32>,
    pub first_day: u32,
    /// Defaults to the last day of the month.
    pub last_day: Option<u32>,
    /// Daily target, hours part.
    pub hours: u32,
    /// Daily target, minutes part.
    pub minutes: u32,
    /// Use the weekday + holiday rule instead of the day-status service.
    pub local_calendar: bool,
    pub day_status_url: String,
    /// IANA timezone entries are stamped in.
    pub timezone: String,
    pub locale: Locale,
    /// Extra days off for the local rule.
    pub holidays: Vec<NaiveDate>,
    /// Work items, in the order time is split across them.
    pub issues: Vec<IssueConfig>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("jira_url", &self.jira_url)
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("year", &self.year)
            .field("month", &self.month)
            .field("first_day", &self.first_day)
            .field("last_day", &self.last_day)
            .field("hours", &self.hours)
            .field("minutes", &self.minutes)
            .field("local_calendar", &self.local_calendar)
            .field("day_status_url", &self.day_status_url)
            .field("timezone", &self.timezone)
            .field("locale", &self.locale)
            .field("holidays", &self.holidays)
            .field("issues", &self.issues)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jira_url: String::new(),
            login: String::new(),
            password: None,
            year: None,
            month: None,
            first_day: 1,
            last_day: None,
            hours: 8,
            minutes: 0,
            local_calendar: false,
            day_status_url: DEFAULT_DAY_STATUS_URL.to_string(),
            timezone: "Europe/Moscow".to_string(),
            locale: Locale::default(),
            holidays: Vec::new(),
            issues: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (WL_*)
        figment = figment.merge(Env::prefixed("WL_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for wl.
///
/// On Linux: `~/.config/wl`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wl"))
}
