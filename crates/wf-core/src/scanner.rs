//! Character-level lexer over one timesheet source.
//!
//! The scanner is pull-based: the parser asks for the next number, time,
//! code or piece of text and the scanner consumes exactly that much input.
//! Whitespace and `#` comments are skipped by most readers; the line counter
//! advances on every consumed newline so errors point at the right line.

use std::io::Read;
use std::path::Path;

use encoding_rs::WINDOWS_1252;

use crate::error::{Error, ParseError, ParseErrorKind};
use crate::time::TimeValue;

/// Path that selects standard input.
pub const STDIN_PATH: &str = "-";

const STDIN_NAME: &str = "<Standard input>";

/// First characters of the time codes.
const TIME_TYPE_CHARS: [char; 12] = ['s', 'S', 'h', 'H', 'n', 'N', 'r', 'R', 'ö', 'Ö', 'p', 'P'];

/// Largest header balance magnitude in minutes; several balances are summed
/// at month end and the sum must stay within `i32`.
const MAX_BALANCE_MINUTES: u32 = i32::MAX.unsigned_abs() / 16;

/// Punctuation allowed inside names.
const SPECIAL_CHARS: [char; 8] = ['!', '-', '"', '(', ')', '_', '.', ','];

fn is_text_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, 'å' | 'ä' | 'ö' | 'Å' | 'Ä' | 'Ö')
}

fn is_activity_char(c: char) -> bool {
    is_text_char(c) || c.is_ascii_digit() || c == '.' || c == '-'
}

/// Decodes timesheet bytes: UTF-8 when valid, Windows-1252 otherwise.
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::debug!("input is not UTF-8, decoding as Windows-1252");
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    file: String,
    line: usize,
}

impl Scanner {
    /// Opens a file, or standard input when `path` is `-`.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let open_error = |source| Error::Open {
            path: path.to_path_buf(),
            source,
        };

        if path == Path::new(STDIN_PATH) {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .map_err(open_error)?;
            return Ok(Self::from_bytes(STDIN_NAME, &bytes));
        }

        let bytes = std::fs::read(path).map_err(open_error)?;
        Ok(Self::from_bytes(path.display().to_string(), &bytes))
    }

    pub fn from_bytes(file: impl Into<String>, bytes: &[u8]) -> Self {
        Self::from_text(file, &decode(bytes))
    }

    pub fn from_text(file: impl Into<String>, text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            file: file.into(),
            line: 1,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file
    }

    /// 1-based line of the next unread character.
    pub const fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            file: self.file.clone(),
            line: self.line,
            kind,
        }
    }

    fn describe(c: Option<char>) -> String {
        match c {
            None => "end of file".to_string(),
            Some('\n') => "end of line".to_string(),
            Some(c) => format!("'{c}'"),
        }
    }

    fn describe_next(&self) -> String {
        Self::describe(self.peek_char())
    }

    // ---------- single characters ----------

    /// Next character without consuming it; `None` at end of file.
    pub fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn peek_end_of_file(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub fn peek_end_of_line(&self) -> bool {
        matches!(self.peek_char(), None | Some('\n'))
    }

    /// Consumes one character.
    pub fn skip_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Skips whitespace, then consumes `expected` or fails.
    pub fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.skip_char() {
            Some(c) if c == expected => Ok(()),
            other => Err(self.error(ParseErrorKind::UnexpectedChar {
                expected,
                found: Self::describe(other),
            })),
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek_char().filter(|&c| pred(c)) {
            out.push(c);
            self.skip_char();
        }
        out
    }

    // ---------- whitespace ----------

    /// Skips blanks, newlines and `#` comments, in any interleaving.
    pub fn skip_whitespace(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.skip_char();
                }
                Some('#') => self.skip_comment(),
                _ => break,
            }
        }
    }

    /// Skips blanks without leaving the current line.
    pub fn skip_space(&mut self) {
        while matches!(self.peek_char(), Some(' ' | '\t' | '\r')) {
            self.skip_char();
        }
    }

    /// Skips to (not past) the end of the current line.
    pub fn skip_comment(&mut self) {
        while !self.peek_end_of_line() {
            self.skip_char();
        }
    }

    // ---------- text ----------

    /// A run of letters, Swedish å/ä/ö included. Empty if none match.
    pub fn get_text(&mut self) -> String {
        self.skip_whitespace();
        self.take_while(is_text_char)
    }

    /// Like [`Scanner::get_text`] but also accepts digits, `.` and `-`.
    pub fn get_activity(&mut self) -> String {
        self.skip_whitespace();
        self.take_while(is_activity_char)
    }

    /// At most one punctuation character allowed in names.
    pub fn get_special_text(&mut self) -> String {
        self.skip_space();
        match self.peek_char() {
            Some(c) if SPECIAL_CHARS.contains(&c) => {
                self.skip_char();
                c.to_string()
            }
            _ => String::new(),
        }
    }

    /// Reads a free-text name up to the end of the line.
    ///
    /// Words separated by blanks are joined with a single space; punctuation
    /// glues to its neighbours (`Anna - Karin` reads as `Anna-Karin`).
    pub fn get_name(&mut self) -> Result<String, ParseError> {
        self.skip_space();
        if self.peek_end_of_line() {
            return Err(self.error(ParseErrorKind::MissingName));
        }

        let mut name = self.take_while(is_text_char);
        loop {
            self.skip_space();
            if self.peek_end_of_line() {
                break;
            }

            let special = self.get_special_text();
            if !special.is_empty() {
                name.push_str(&special);
                self.skip_space();
                name.push_str(&self.take_while(is_text_char));
                continue;
            }

            let word = self.take_while(is_text_char);
            match self.peek_char() {
                _ if !word.is_empty() => {
                    if !name.is_empty() {
                        name.push(' ');
                    }
                    name.push_str(&word);
                }
                Some(c) => return Err(self.error(ParseErrorKind::InvalidNameChar(c))),
                None => break,
            }
        }
        Ok(name)
    }

    /// Rest of the line after leading blanks, newline excluded.
    pub fn get_comment(&mut self) -> String {
        self.skip_space();
        let comment = self.take_while(|c| c != '\n');
        comment.trim_end_matches('\r').to_string()
    }

    /// Reads a word and fails unless it equals `expected`.
    pub fn expect_text(&mut self, expected: &str) -> Result<(), ParseError> {
        let found = self.get_text();
        if found == expected {
            Ok(())
        } else {
            Err(self.error(ParseErrorKind::UnexpectedText {
                expected: expected.to_string(),
                found,
            }))
        }
    }

    // ---------- numbers ----------

    /// A signed decimal integer, after skipping whitespace.
    pub fn get_number(&mut self) -> Result<i32, ParseError> {
        self.skip_whitespace();
        let mut text = String::new();
        if let Some(sign @ ('-' | '+')) = self.peek_char() {
            text.push(sign);
            self.skip_char();
        }
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(self.error(ParseErrorKind::ExpectedNumber {
                found: self.describe_next(),
            }));
        }
        text.push_str(&digits);
        text.parse()
            .map_err(|_| self.error(ParseErrorKind::NumberOutOfRange(text)))
    }

    /// Optional `-`-separated project numbers such as `1234-5678`.
    ///
    /// Returns an empty list when the next character is not a digit.
    pub fn get_proj_number(&mut self) -> Result<Vec<i32>, ParseError> {
        self.skip_whitespace();
        if !self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            return Ok(Vec::new());
        }

        let mut numbers = vec![self.get_number()?];
        while self.peek_char() == Some('-') {
            self.skip_char();
            if !self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error(ParseErrorKind::MissingProjectNumber {
                    found: self.describe_next(),
                }));
            }
            numbers.push(self.get_number()?);
        }
        Ok(numbers)
    }

    /// `H[:MM]` as a minute count; the minutes take the sign of the hours.
    pub fn get_minutes(&mut self) -> Result<i32, ParseError> {
        let hours = self.get_number()?;
        let mut minutes = hours
            .checked_mul(60)
            .ok_or_else(|| self.error(ParseErrorKind::NumberOutOfRange(hours.to_string())))?;
        if self.peek_char() == Some(':') {
            self.expect_char(':')?;
            let extra = self.get_number()?;
            minutes += if minutes < 0 { -extra } else { extra };
        }
        Ok(minutes)
    }

    // ---------- times and codes ----------

    fn read_clock(&mut self, bounded_hours: bool) -> Result<TimeValue, ParseError> {
        self.skip_space();
        let negative = self.peek_char() == Some('-');
        if negative {
            self.skip_char();
        }
        let hours = self.get_number()?;
        let minutes = if self.peek_char() == Some(':') {
            self.skip_char();
            self.get_number()?
        } else {
            0
        };

        if !(0..=59).contains(&minutes) || (bounded_hours && !(-24..=24).contains(&hours)) {
            return Err(self.error(ParseErrorKind::TimeOutOfRange { hours, minutes }));
        }
        let total = hours.checked_mul(60).and_then(|m| m.checked_add(minutes));
        if total.is_none_or(|m| m.unsigned_abs() > MAX_BALANCE_MINUTES) {
            return Err(self.error(ParseErrorKind::NumberOutOfRange(format!(
                "{hours}:{minutes:02}"
            ))));
        }
        Ok(TimeValue::new(hours, minutes, negative))
    }

    /// A clock time in a row; hours must lie in `-24..=24`.
    pub fn get_time(&mut self) -> Result<TimeValue, ParseError> {
        self.read_clock(true)
    }

    /// A balance in the header; any number of hours.
    pub fn get_header_time(&mut self) -> Result<TimeValue, ParseError> {
        self.read_clock(false)
    }

    /// One of the time codes `n h r s p ö` with the two-letter forms
    /// `sj`/`SJ` and `ö1`/`ö2`/`Ö1`/`Ö2`.
    pub fn get_time_type(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace();
        let first = match self.peek_char() {
            Some(c) if TIME_TYPE_CHARS.contains(&c) => c,
            other => {
                return Err(self.error(ParseErrorKind::UnknownTimeType {
                    found: Self::describe(other),
                }));
            }
        };
        self.skip_char();

        let mut code = first.to_string();
        let second = match (first, self.peek_char()) {
            ('ö' | 'Ö', Some(d @ ('1' | '2'))) => Some(d),
            ('s', Some('j')) => Some('j'),
            ('S', Some('J')) => Some('J'),
            _ => None,
        };
        if let Some(d) = second {
            code.push(d);
            self.skip_char();
        }
        Ok(code)
    }
}
