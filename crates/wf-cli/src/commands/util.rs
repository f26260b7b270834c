//! Shared utilities for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use wf_core::{Record, Summary, aggregate, parse_file};

/// Parses and aggregates one timesheet.
pub fn load_timesheet(path: &Path) -> Result<(Record, Summary)> {
    let record =
        parse_file(path).with_context(|| format!("failed to read timesheet {}", path.display()))?;
    let summary = aggregate(&record);
    tracing::debug!(
        days = summary.days.len(),
        warnings = summary.warnings.len(),
        "aggregated timesheet"
    );
    Ok((record, summary))
}

/// Fails when `strict` is set and the month produced warnings.
pub fn check_strict(summary: &Summary, strict: bool) -> Result<()> {
    let count = summary.warnings.len();
    if strict && count > 0 {
        anyhow::bail!("{count} warning(s) in strict mode");
    }
    Ok(())
}
