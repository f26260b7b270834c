//! Row category codes as a closed enum.

use std::fmt;

use serde::{Serialize, Serializer};

/// The time bucket a row belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// `n`: ordinary working time.
    Normal,
    /// `h`: working time on a half day.
    HalfDay,
    /// `r`: travel.
    Travel,
    /// `ö1`: overtime, tier 1.
    Overtime1,
    /// `ö2`: overtime, tier 2.
    Overtime2,
    /// `s`: vacation.
    Vacation,
    /// `sj`: sick leave.
    Sick,
    /// `p`: leave of absence, counted as normal time.
    Leave,
    /// A scanned code that names no bucket, e.g. a bare `ö`.
    Other(String),
}

impl Category {
    /// Resolves a scanned code. Matching is case-insensitive.
    pub fn from_code(code: &str) -> Self {
        match code.to_lowercase().as_str() {
            "n" => Self::Normal,
            "h" => Self::HalfDay,
            "r" => Self::Travel,
            "ö1" => Self::Overtime1,
            "ö2" => Self::Overtime2,
            "s" => Self::Vacation,
            "sj" => Self::Sick,
            "p" => Self::Leave,
            _ => Self::Other(code.to_string()),
        }
    }

    pub fn as_code(&self) -> &str {
        match self {
            Self::Normal => "n",
            Self::HalfDay => "h",
            Self::Travel => "r",
            Self::Overtime1 => "ö1",
            Self::Overtime2 => "ö2",
            Self::Vacation => "s",
            Self::Sick => "sj",
            Self::Leave => "p",
            Self::Other(code) => code,
        }
    }

    /// Counts toward the "normal" column of the activity breakdown.
    pub const fn is_normal_time(&self) -> bool {
        matches!(self, Self::Normal | Self::HalfDay | Self::Leave)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_resolve_case_insensitively() {
        assert_eq!(Category::from_code("n"), Category::Normal);
        assert_eq!(Category::from_code("N"), Category::Normal);
        assert_eq!(Category::from_code("Ö1"), Category::Overtime1);
        assert_eq!(Category::from_code("ö2"), Category::Overtime2);
        assert_eq!(Category::from_code("SJ"), Category::Sick);
        assert_eq!(Category::from_code("P"), Category::Leave);
    }

    #[test]
    fn bare_overtime_marker_is_other() {
        assert_eq!(Category::from_code("ö"), Category::Other("ö".to_string()));
        assert_eq!(Category::from_code("Ö").to_string(), "Ö");
    }

    #[test]
    fn display_is_lowercase_code() {
        assert_eq!(Category::from_code("Ö2").to_string(), "ö2");
        assert_eq!(Category::HalfDay.to_string(), "h");
    }
}
