//! Core logic for workflex timesheets.
//!
//! This crate contains:
//! - Scanning: character-level tokens with file and line context
//! - Parsing: building a [`Record`] from a timesheet file
//! - Aggregation: folding rows into work days, month totals and warnings
//! - Activity breakdown: time per activity and day

pub mod aggregate;
mod breakdown;
pub mod category;
mod date;
mod error;
pub mod parser;
mod record;
pub mod scanner;
mod time;

pub use aggregate::{
    Aggregation, MonthChecks, MonthTotals, Summary, WORK_MINUTES_PER_DAY, Warning, WarningKind,
    WorkDay, aggregate,
};
pub use breakdown::{ActivityDay, ActivityTime, activity_breakdown};
pub use category::Category;
pub use date::DateValue;
pub use error::{Error, ParseError, ParseErrorKind};
pub use parser::{Parser, parse_file, parse_str};
pub use record::{Record, Row};
pub use scanner::Scanner;
pub use time::TimeValue;
