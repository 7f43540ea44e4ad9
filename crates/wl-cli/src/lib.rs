//! Worklog filler CLI library.
//!
//! This crate provides the CLI interface for filling Jira worklogs.

mod cli;
pub mod commands;
mod config;
mod prompt;
pub mod settings;

pub use cli::{Cli, Commands, PlanArgs, RangeArgs};
pub use config::{Config, IssueConfig};
