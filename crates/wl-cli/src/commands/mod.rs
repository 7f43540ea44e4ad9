//! CLI subcommand implementations.

pub mod days;
pub mod log;
pub mod plan;

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use wl_core::{DayClassifier, LocalCalendar, RemoteClassifier};
use wl_tracker::DayStatusClient;

use crate::Config;
use crate::prompt::read_password;
use crate::settings::CalendarSettings;

/// The day classification strategy selected by the settings.
pub fn classifier_for(settings: &CalendarSettings) -> Result<Box<dyn DayClassifier>> {
    if settings.local_calendar {
        tracing::warn!("days off are computed locally; double-check the resulting worklog");
        let calendar = LocalCalendar::with_public_holidays(settings.range.years())
            .extend(settings.holidays.iter().copied());
        return Ok(Box::new(calendar));
    }

    tracing::info!(url = %settings.day_status_url, "days off are looked up remotely");
    let client = DayStatusClient::new(&settings.day_status_url)
        .context("failed to create day status client")?;
    Ok(Box::new(RemoteClassifier::new(client)))
}

/// The config with a missing password asked for on the terminal.
pub fn with_terminal_password(config: &Config) -> Result<Config> {
    with_password(config, io::stdin().is_terminal(), read_password)
}

/// Fill in a missing password through `read` when `interactive`.
///
/// Non-interactive runs keep the config as is; validation then reports the
/// missing password.
fn with_password<F>(config: &Config, interactive: bool, read: F) -> Result<Config>
where
    F: FnOnce(&str) -> io::Result<String>,
{
    let mut config = config.clone();
    let missing = config.password.as_deref().is_none_or(str::is_empty);
    if missing && interactive {
        let prompt = format!("Jira password for {}: ", config.login);
        config.password = Some(read(&prompt).context("failed to read password")?);
    }
    Ok(config)
}
