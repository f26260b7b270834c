//! Report command for printing the month report.
//!
//! This module implements `wf report` with human-readable and JSON output.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use wf_core::{
    ActivityDay, MonthChecks, MonthTotals, Record, Summary, WarningKind, WorkDay,
    activity_breakdown,
};

use super::util::{check_strict, load_timesheet};
use crate::render::Renderer;

/// Output switches for one report run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub json: bool,
    pub show_activities: bool,
    pub strict: bool,
}

// ========== JSON Output ==========

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    employee_name: &'a str,
    year: i32,
    month: i32,
    days: Vec<JsonDay<'a>>,
    totals: &'a MonthTotals,
    balances: JsonBalances,
    checks: &'a MonthChecks,
    warnings: Vec<JsonWarning<'a>>,
    #[serde(skip_serializing_if = "<[ActivityDay]>::is_empty")]
    activities: &'a [ActivityDay],
}

#[derive(Debug, Serialize)]
struct JsonDay<'a> {
    #[serde(flatten)]
    day: &'a WorkDay,
    total: i32,
    flex: i32,
}

#[derive(Debug, Serialize)]
struct JsonBalances {
    flex: i32,
    comp: i32,
    overtime1: i32,
    overtime2: i32,
    overtime_and_comp: i32,
}

#[derive(Debug, Serialize)]
struct JsonWarning<'a> {
    date: &'a str,
    kind: WarningKind,
    message: &'static str,
}

/// Formats the report as JSON. Durations are in minutes.
pub fn format_report_json(
    record: &Record,
    summary: &Summary,
    activities: &[ActivityDay],
) -> Result<String> {
    let totals = &summary.totals;
    let report = JsonReport {
        employee_name: &record.employee_name,
        year: record.year,
        month: record.month,
        days: summary
            .days
            .iter()
            .map(|day| JsonDay {
                day,
                total: day.total(),
                flex: day.flex(),
            })
            .collect(),
        totals,
        balances: JsonBalances {
            flex: totals.flex_balance(),
            comp: totals.comp_balance(),
            overtime1: totals.overtime1_balance(),
            overtime2: totals.overtime2_balance(),
            overtime_and_comp: totals.overtime_and_comp_balance(),
        },
        checks: &summary.checks,
        warnings: summary
            .warnings
            .iter()
            .map(|w| JsonWarning {
                date: &w.date,
                kind: w.kind,
                message: w.message(),
            })
            .collect(),
        activities,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, path: &Path, options: ReportOptions) -> Result<()> {
    let (record, summary) = load_timesheet(path)?;
    let activities = if options.show_activities {
        activity_breakdown(&record.rows)
    } else {
        Vec::new()
    };

    if options.json {
        let output = format_report_json(&record, &summary, &activities)?;
        writeln!(writer, "{output}")?;
    } else {
        let mut renderer = Renderer::new(writer);
        renderer.report(&record, &summary)?;
        renderer.activities(&activities)?;
    }

    check_strict(&summary, options.strict)
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use wf_core::{aggregate, parse_str};

    const SHEET: &str = "\
Namn: Anna Svensson
Pengar: ja
Flex: 1:00
Komp: 0:00
Komputtag: 0:00
Övertid 1: 0:00
Övertid 2: 0:00
År: 2023
Månad: 1
2023-01-02 mån 08:00 16:00 n
2023-01-03 tis 10:00 11:00 r
";

    fn options(json: bool) -> ReportOptions {
        ReportOptions {
            json,
            show_activities: true,
            strict: false,
        }
    }

    fn write_sheet(dir: &Path, text: &str) -> std::path::PathBuf {
        let path = dir.join("jan.txt");
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_report_json_output() {
        let record = parse_str("jan.txt", SHEET).unwrap();
        let summary = aggregate(&record);
        let output = format_report_json(&record, &summary, &[]).unwrap();
        assert_snapshot!(output, @r#"
{
  "employee_name": "Anna Svensson",
  "year": 2023,
  "month": 1,
  "days": [
    {
      "date": "2023-01-02",
      "day_name": "mån",
      "normal": 480,
      "overtime1": 0,
      "overtime2": 0,
      "travel": 0,
      "sick": 0,
      "leave": 0,
      "vacation": false,
      "half_day": false,
      "warning": false,
      "total": 480,
      "flex": 30
    },
    {
      "date": "2023-01-03",
      "day_name": "tis",
      "normal": 0,
      "overtime1": 0,
      "overtime2": 0,
      "travel": 60,
      "sick": 0,
      "leave": 0,
      "vacation": false,
      "half_day": false,
      "warning": true,
      "total": 0,
      "flex": -450
    }
  ],
  "totals": {
    "opening_flex": "01:00",
    "opening_comp": "00:00",
    "closing_comp": "00:00",
    "opening_overtime1": "00:00",
    "opening_overtime2": "00:00",
    "in_money": true,
    "flex": -420,
    "normal": 480,
    "leave": 0,
    "travel": 60,
    "sick": 0,
    "total": 480,
    "overtime1": 0,
    "overtime2": 0,
    "vacation_days": 0,
    "weekdays": 2
  },
  "balances": {
    "flex": -360,
    "comp": 0,
    "overtime1": 0,
    "overtime2": 0,
    "overtime_and_comp": 0
  },
  "checks": {
    "flex_out_of_range": false,
    "comp_over_limit": false,
    "overtime_over_limit": false,
    "overtime_and_comp_over_limit": false
  },
  "warnings": [
    {
      "date": "2023-01-03",
      "kind": "travel_during_office_hours",
      "message": "Restid räknas endast utanför intervallet helgfria mån-fre 8:30-17:00."
    },
    {
      "date": "2023-01-03",
      "kind": "short_day",
      "message": "Du har jobbat lite!"
    }
  ]
}
"#);
    }

    #[test]
    fn test_run_writes_text_report() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_sheet(temp.path(), SHEET);

        let mut output = Vec::new();
        run(&mut output, &path, options(false)).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Tidrapport Anna Svensson 2023-01\n"));
        assert!(output.contains(" 2023-01-02      8:00      0:30      8:00"));
        assert!(output.contains(" Varningar\n"));
        assert!(!output.contains(" Aktivitet"));
    }

    #[test]
    fn test_run_json_is_valid() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_sheet(temp.path(), SHEET);

        let mut output = Vec::new();
        run(&mut output, &path, options(true)).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["warnings"].as_array().unwrap().len(), 2);
        assert!(value.get("activities").is_none());
    }

    #[test]
    fn test_run_lists_activities_unless_disabled() {
        let temp = tempfile::tempdir().unwrap();
        let text = SHEET
            .replace("16:00 n", "16:00 n utveckling")
            .replace("11:00 r", "11:00 r resa");
        let path = write_sheet(temp.path(), &text);

        let mut output = Vec::new();
        run(&mut output, &path, options(false)).unwrap();
        assert!(String::from_utf8(output).unwrap().contains(" Aktivitet"));

        let mut output = Vec::new();
        let quiet = ReportOptions {
            show_activities: false,
            ..options(false)
        };
        run(&mut output, &path, quiet).unwrap();
        assert!(!String::from_utf8(output).unwrap().contains(" Aktivitet"));
    }

    #[test]
    fn test_run_strict_fails_after_writing_report() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_sheet(temp.path(), SHEET);

        let mut output = Vec::new();
        let strict = ReportOptions {
            strict: true,
            ..options(false)
        };
        let err = run(&mut output, &path, strict).unwrap_err();
        assert_eq!(err.to_string(), "2 warning(s) in strict mode");
        assert!(!output.is_empty());
    }
}
