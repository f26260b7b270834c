//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Monthly time report for workflex timesheets.
///
/// Reads one month of time rows, checks them against the flex, comp and
/// overtime rules, and prints the month report.
#[derive(Debug, Parser)]
#[command(name = "wf", version, about, long_about = None)]
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
    /// Print the month report for a timesheet.
    Report {
        /// Timesheet file, or `-` for standard input.
        file: PathBuf,

        /// Output days, totals and warnings as JSON.
        #[arg(long)]
        json: bool,

        /// Leave out the per-activity table.
        #[arg(long)]
        no_activities: bool,

        /// Exit with an error if any warning was produced.
        #[arg(long)]
        strict: bool,
    },

    /// Print only the warnings for a timesheet.
    Check {
        /// Timesheet file, or `-` for standard input.
        file: PathBuf,

        /// Exit with an error if any warning was produced.
        #[arg(long)]
        strict: bool,
    },
}
