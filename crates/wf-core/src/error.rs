//! Error types for reading timesheets.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A malformed or unexpected token, located in the source.
///
/// Always fatal: parsing stops at the first one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Parse error in {file} line {line}: {kind}")]
pub struct ParseError {
    pub file: String,
    pub line: usize,
    pub kind: ParseErrorKind,
}

/// What went wrong at the error location.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("expected '{expected}', found {found}")]
    UnexpectedChar { expected: char, found: String },

    #[error("expected \"{expected}\", found \"{found}\"")]
    UnexpectedText { expected: String, found: String },

    #[error("expected a number, found {found}")]
    ExpectedNumber { found: String },

    #[error("number out of range: {0}")]
    NumberOutOfRange(String),

    #[error("time {hours}:{minutes:02} out of range")]
    TimeOutOfRange { hours: i32, minutes: i32 },

    #[error("expected a time code (n, h, r, ö1, ö2, s, sj, p), found {found}")]
    UnknownTimeType { found: String },

    #[error("expected a name before end of line")]
    MissingName,

    #[error("unexpected character '{0}' in name")]
    InvalidNameChar(char),

    #[error("expected a project number after '-', found {found}")]
    MissingProjectNumber { found: String },

    #[error("expected overtime tier {expected}, found {found}")]
    WrongOvertimeTier { expected: i32, found: i32 },
}

/// Errors from reading and parsing one timesheet.
#[derive(Debug, Error)]
pub enum Error {
    /// The input could not be opened or read.
    #[error("could not open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}
