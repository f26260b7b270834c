//! Signed hours:minutes quantities.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

/// A signed clock quantity such as `08:30` or `-0:45`.
///
/// The sign is stored apart from the magnitude so that `-0:30` is
/// representable. Equality, ordering and hashing go through
/// [`TimeValue::as_minutes`], which makes `-0:00` equal to `0:00`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeValue {
    hours: i32,
    minutes: i32,
    negative: bool,
}

impl TimeValue {
    /// Zero duration.
    pub const ZERO: Self = Self::new(0, 0, false);

    /// Builds a value from its parts; `minutes` must lie in `0..=59`.
    pub const fn new(hours: i32, minutes: i32, negative: bool) -> Self {
        debug_assert!(minutes >= 0 && minutes < 60, "minutes out of range");
        Self {
            hours,
            minutes,
            negative,
        }
    }

    /// Builds the canonical value for a signed minute count.
    pub const fn from_minutes(total: i32) -> Self {
        let magnitude = total.abs();
        Self {
            hours: magnitude / 60,
            minutes: magnitude % 60,
            negative: total < 0,
        }
    }

    pub const fn hours(&self) -> i32 {
        self.hours
    }

    pub const fn minutes(&self) -> i32 {
        self.minutes
    }

    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// Signed total minutes: `sign × (hours × 60 + minutes)`.
    pub const fn as_minutes(&self) -> i32 {
        let magnitude = self.hours * 60 + self.minutes;
        if self.negative { -magnitude } else { magnitude }
    }

    /// Value in hours as a float, e.g. `7.5` for `7:30`.
    pub fn as_hours(&self) -> f64 {
        f64::from(self.as_minutes()) / 60.0
    }
}

impl PartialEq for TimeValue {
    fn eq(&self, other: &Self) -> bool {
        self.as_minutes() == other.as_minutes()
    }
}

impl Eq for TimeValue {}

impl PartialOrd for TimeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_minutes().cmp(&other.as_minutes())
    }
}

impl Hash for TimeValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_minutes().hash(state);
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        write!(f, "{sign}{:02}:{:02}", self.hours, self.minutes)
    }
}

impl Serialize for TimeValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
