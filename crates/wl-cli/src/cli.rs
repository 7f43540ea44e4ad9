//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Worklog filler.
///
/// Spreads a daily time budget across Jira issues for every working day in
/// a range, topping up days that already have time logged.
#[derive(Debug, Parser)]
#[command(name = "wl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show which days in the range are workdays, cut days, or days off.
    Days(RangeArgs),

    /// Compute the worklog without submitting anything.
    Plan(PlanArgs),

    /// Compute the worklog and submit it after confirmation.
    Log {
        #[command(flatten)]
        plan: PlanArgs,

        /// Submit without asking (overtime still needs acknowledgment).
        #[arg(long)]
        yes: bool,
    },
}

/// Date range selection. Unset values fall back to the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct RangeArgs {
    /// Year to fill (current or previous).
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Month to fill (1-12).
    #[arg(short, long)]
    pub month: Option<u32>,

    /// First day of the range within the month.
    #[arg(long)]
    pub first_day: Option<u32>,

    /// Last day of the range within the month (default: end of month).
    #[arg(long)]
    pub last_day: Option<u32>,

    /// Classify days with the local weekday + holiday rule.
    #[arg(long)]
    pub local_calendar: bool,
}

/// Range plus daily target and work items.
#[derive(Debug, Clone, Default, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Hours to log per day (0-8).
    #[arg(short = 'H', long)]
    pub hours: Option<u32>,

    /// Extra minutes to log per day (0-59).
    #[arg(short = 'M', long)]
    pub minutes: Option<u32>,

    /// Work item as KEY or KEY:comment; repeat to split time. Replaces configured issues.
    #[arg(short, long = "issue", value_name = "KEY[:COMMENT]")]
    pub issues: Vec<String>,
}
