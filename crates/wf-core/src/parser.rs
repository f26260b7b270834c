//! Builds a [`Record`] from scanner tokens.
//!
//! # Format
//!
//! ```text
//! Namn: Anna Svensson
//! Pengar: nej
//! Flex: 10:00
//! Komp: 0:00
//! Komputtag: 0:00
//! Övertid 1: 0:00
//! Övertid 2: 0:00
//! År: 2023
//! Månad: 1
//!
//! # date      day  from  to    code [project] [activity] [comment]
//! 2023-01-02 mån 08:00 16:00 n 1234-56 backend fixed the build
//! ```
//!
//! Header fields come in this fixed order. Each row sits on one line; the
//! optional trailing fields never continue onto the next line. Any error
//! aborts the whole parse.

use std::path::Path;

use crate::category::Category;
use crate::date::DateValue;
use crate::error::{Error, ParseError, ParseErrorKind};
use crate::record::{Record, Row};
use crate::scanner::Scanner;
use crate::time::TimeValue;

pub struct Parser {
    scanner: Scanner,
}

impl Parser {
    pub const fn new(scanner: Scanner) -> Self {
        Self { scanner }
    }

    /// Parses header and rows until end of input.
    pub fn parse(mut self) -> Result<Record, ParseError> {
        let mut record = self.parse_header()?;

        loop {
            self.scanner.skip_whitespace();
            if self.scanner.peek_end_of_file() {
                break;
            }
            record.rows.push(self.parse_row()?);
        }

        tracing::debug!(
            file = self.scanner.file_name(),
            rows = record.rows.len(),
            "parsed timesheet"
        );
        Ok(record)
    }

    fn label(&mut self, label: &str) -> Result<(), ParseError> {
        self.scanner.expect_text(label)?;
        self.scanner.expect_char(':')
    }

    fn overtime_balance(&mut self, tier: i32) -> Result<TimeValue, ParseError> {
        self.scanner.expect_text("Övertid")?;
        let found = self.scanner.get_number()?;
        if found != tier {
            return Err(self.scanner.error(ParseErrorKind::WrongOvertimeTier {
                expected: tier,
                found,
            }));
        }
        self.scanner.expect_char(':')?;
        self.scanner.get_header_time()
    }

    fn parse_header(&mut self) -> Result<Record, ParseError> {
        self.label("Namn")?;
        let employee_name = self.scanner.get_name()?;

        self.label("Pengar")?;
        let in_money = matches!(self.scanner.get_text().as_str(), "ja" | "JA");

        self.label("Flex")?;
        let opening_flex = self.scanner.get_header_time()?;
        self.label("Komp")?;
        let opening_comp = self.scanner.get_header_time()?;
        self.label("Komputtag")?;
        let closing_comp = self.scanner.get_header_time()?;
        let opening_overtime1 = self.overtime_balance(1)?;
        let opening_overtime2 = self.overtime_balance(2)?;

        self.label("År")?;
        let year = self.scanner.get_number()?;
        self.label("Månad")?;
        let month = self.scanner.get_number()?;

        Ok(Record {
            employee_name,
            in_money,
            opening_flex,
            opening_comp,
            closing_comp,
            opening_overtime1,
            opening_overtime2,
            year,
            month,
            rows: Vec::new(),
        })
    }

    /// True when another optional field follows on this line.
    fn at_field(&mut self) -> bool {
        self.scanner.skip_space();
        !self.scanner.peek_end_of_line() && self.scanner.peek_char() != Some('#')
    }

    fn parse_row(&mut self) -> Result<Row, ParseError> {
        let line = self.scanner.line();

        let year = self.scanner.get_number()?;
        self.scanner.expect_char('-')?;
        let month = self.scanner.get_number()?;
        self.scanner.expect_char('-')?;
        let day = self.scanner.get_number()?;

        let day_name = self.scanner.get_text();
        let from = self.scanner.get_time()?;
        let to = self.scanner.get_time()?;
        let category = Category::from_code(&self.scanner.get_time_type()?);

        let project_numbers = if self.at_field()
            && self.scanner.peek_char().is_some_and(|c| c.is_ascii_digit())
        {
            self.scanner.get_proj_number()?
        } else {
            Vec::new()
        };

        let activity = if self.at_field() {
            self.scanner.get_activity()
        } else {
            String::new()
        };

        self.scanner.skip_space();
        let comment = if self.scanner.peek_end_of_line() {
            String::new()
        } else {
            let text = self.scanner.get_comment();
            match text.strip_prefix('#') {
                Some(rest) => rest.trim_start().to_string(),
                None => text,
            }
        };

        Ok(Row {
            date: DateValue::new(year, month, day),
            day_name,
            from,
            to,
            category,
            project_numbers,
            activity,
            comment,
            line,
        })
    }
}

/// Parses a timesheet file, or standard input for `-`.
pub fn parse_file(path: &Path) -> Result<Record, Error> {
    let scanner = Scanner::open(path)?;
    Ok(Parser::new(scanner).parse()?)
}

/// Parses timesheet text; `file` is only used in error messages.
pub fn parse_str(file: &str, text: &str) -> Result<Record, ParseError> {
    Parser::new(Scanner::from_text(file, text)).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\
# januari
Namn: Anna Svensson
Pengar: ja
Flex: 10:00
Komp: 0:00
Komputtag: 1:30
Övertid 1: 2:00
Övertid 2: -0:30
År: 2023
Månad: 1
";

    fn parse(rows: &str) -> Result<Record, ParseError> {
        parse_str("jan.txt", &format!("{HEADER}{rows}"))
    }

    #[test]
    fn header_fields_are_read_in_order() {
        let record = parse("").unwrap();
        assert_eq!(record.employee_name, "Anna Svensson");
        assert!(record.in_money);
        assert_eq!(record.opening_flex, TimeValue::new(10, 0, false));
        assert_eq!(record.opening_comp, TimeValue::ZERO);
        assert_eq!(record.closing_comp.as_minutes(), 90);
        assert_eq!(record.opening_overtime1.as_minutes(), 120);
        assert_eq!(record.opening_overtime2.as_minutes(), -30);
        assert_eq!(record.year, 2023);
        assert_eq!(record.month, 1);
        assert!(record.rows.is_empty());
    }

    #[test]
    fn in_money_only_for_ja() {
        for (flag, expected) in [("ja", true), ("JA", true), ("Ja", false), ("nej", false)] {
            let text = HEADER.replace("Pengar: ja", &format!("Pengar: {flag}"));
            assert_eq!(parse_str("x", &text).unwrap().in_money, expected, "{flag}");
        }
    }

    #[test]
    fn minimal_row() {
        let record = parse("2023-01-02 mån 08:00 16:00 n\n").unwrap();
        assert_eq!(record.rows.len(), 1);
        let row = &record.rows[0];
        assert_eq!(row.date, DateValue::new(2023, 1, 2));
        assert_eq!(row.day_name, "mån");
        assert_eq!(row.category, Category::Normal);
        assert_eq!(row.duration(), 480);
        assert!(row.project_numbers.is_empty());
        assert_eq!(row.activity, "");
        assert_eq!(row.comment, "");
        assert_eq!(row.line, 11);
    }

    #[test]
    fn full_row() {
        let record =
            parse("2023-01-03 tis 08:00 12:00 N 1234-56 backend-v2 fixed the build\n").unwrap();
        let row = &record.rows[0];
        assert_eq!(row.project_numbers, vec![1234, 56]);
        assert_eq!(row.activity, "backend-v2");
        assert_eq!(row.comment, "fixed the build");
    }

    #[test]
    fn optional_fields_do_not_cross_lines() {
        let record = parse(
            "2023-01-02 mån 08:00 12:00 n\n\
             2023-01-02 mån 12:30 16:30 n\n",
        )
        .unwrap();
        assert_eq!(record.rows.len(), 2);
        assert!(record.rows[0].project_numbers.is_empty());
        assert_eq!(record.rows[1].from, TimeValue::new(12, 30, false));
    }

    #[test]
    fn trailing_hash_comment_is_kept_without_marker() {
        let record = parse("2023-01-02 mån 08:00 16:00 n dev # standup\n").unwrap();
        assert_eq!(record.rows[0].activity, "dev");
        assert_eq!(record.rows[0].comment, "standup");
    }

    #[test]
    fn comment_lines_between_rows_are_skipped() {
        let record = parse(
            "# vecka 1\n\
             2023-01-02 mån 08:00 16:00 n\n\
             \n   # lunch\n\
             2023-01-03 tis 08:00 16:00 ö1\n",
        )
        .unwrap();
        assert_eq!(record.rows.len(), 2);
        assert_eq!(record.rows[1].category, Category::Overtime1);
        assert_eq!(record.rows[1].line, 15);
    }

    #[test]
    fn bare_overtime_code_becomes_other() {
        let record = parse("2023-01-02 mån 18:00 19:00 ö\n").unwrap();
        assert_eq!(record.rows[0].category, Category::Other("ö".to_string()));
    }

    #[test]
    fn missing_label_is_an_error() {
        let err = parse_str("bad.txt", "Name: Anna\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedText { .. }));
    }

    #[test]
    fn oversized_header_balance_is_an_error() {
        let text = HEADER.replace("Flex: 10:00", "Flex: 40000000:00");
        let err = parse_str("jan.txt", &text).unwrap_err();
        assert_eq!(err.line, 4);
        assert!(matches!(err.kind, ParseErrorKind::NumberOutOfRange(_)));
    }

    #[test]
    fn wrong_overtime_tier_is_an_error() {
        let text = HEADER.replace("Övertid 2:", "Övertid 3:");
        let err = parse_str("x", &text).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::WrongOvertimeTier {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn row_error_reports_its_line() {
        let err = parse(
            "2023-01-02 mån 08:00 16:00 n\n\
             2023-01-03 tis 08:00 25:00 n\n",
        )
        .unwrap_err();
        assert_eq!(err.line, 12);
        assert_eq!(
            err.to_string(),
            "Parse error in jan.txt line 12: time 25:00 out of range"
        );
    }

    #[test]
    fn unknown_code_is_an_error() {
        let err = parse("2023-01-02 mån 08:00 16:00 x\n").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnknownTimeType { .. }));
    }

    #[test]
    fn missing_code_is_an_error() {
        let err = parse(
            "2023-01-02 mån 08:00 16:00\n\
             2023-01-03 tis 08:00 16:00 n\n",
        )
        .unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnknownTimeType { .. }));
    }

    #[test]
    fn parse_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jan.txt");
        std::fs::write(&path, format!("{HEADER}2023-01-02 mån 08:00 16:00 n\n")).unwrap();

        let record = parse_file(&path).unwrap();
        assert_eq!(record.rows.len(), 1);
    }

    #[test]
    fn parse_file_reports_missing_file() {
        let err = parse_file(Path::new("/nonexistent/jan.txt")).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }
}
