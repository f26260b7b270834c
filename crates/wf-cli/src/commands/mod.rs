//! CLI subcommand implementations.

pub mod check;
pub mod report;
mod util;
