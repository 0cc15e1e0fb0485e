//! Wall-clock times and activity classifications for time blocks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Minutes in a day; valid times are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A naive wall-clock time within a single day, stored as minutes since midnight.
///
/// There is no overnight wraparound: `23:30` is always later than `00:15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Builds a time from hour and minute, returning `None` when out of range.
    #[must_use]
    pub const fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Builds a time from minutes since midnight, returning `None` past `23:59`.
    #[must_use]
    pub const fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(Self(minutes))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    #[must_use]
    pub const fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Minutes from `self` forward to `later`, saturating at zero.
    #[must_use]
    pub fn minutes_until(self, later: Self) -> u32 {
        u32::from(later.0.saturating_sub(self.0))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Error for a token that is not a valid `HH:MM` time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTime(String);

impl InvalidTime {
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvalidTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time: {}", self.0)
    }
}

impl std::error::Error for InvalidTime {}

impl FromStr for TimeOfDay {
    type Err = InvalidTime;

    /// Parses exactly `HH:MM` (two digits each).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidTime(s.to_string());
        let (hh, mm) = s.split_once(':').ok_or_else(invalid)?;
        if hh.len() != 2 || mm.len() != 2 {
            return Err(invalid());
        }
        if !hh.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hour: u16 = hh.parse().map_err(|_| invalid())?;
        let minute: u16 = mm.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Kind of activity recorded in a time block label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActivityType {
    Task,
    Meeting,
    Comms,
    Admin,
    Learning,
    Break,
}

impl ActivityType {
    pub const ALL: [Self; 6] = [
        Self::Task,
        Self::Meeting,
        Self::Comms,
        Self::Admin,
        Self::Learning,
        Self::Break,
    ];

    /// Resolves the single-letter label code (`T:`, `M:`, ...).
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'T' => Some(Self::Task),
            'M' => Some(Self::Meeting),
            'C' => Some(Self::Comms),
            'A' => Some(Self::Admin),
            'L' => Some(Self::Learning),
            'B' => Some(Self::Break),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Task => 'T',
            Self::Meeting => 'M',
            Self::Comms => 'C',
            Self::Admin => 'A',
            Self::Learning => 'L',
            Self::Break => 'B',
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::Meeting => "Meeting",
            Self::Comms => "Comms",
            Self::Admin => "Admin",
            Self::Learning => "Learning",
            Self::Break => "Break",
        }
    }

    /// Focus category this activity counts toward. Breaks have none.
    #[must_use]
    pub const fn focus(self) -> Option<FocusCategory> {
        match self {
            Self::Task | Self::Learning => Some(FocusCategory::Deep),
            Self::Meeting => Some(FocusCategory::Meeting),
            Self::Comms | Self::Admin => Some(FocusCategory::Shallow),
            Self::Break => None,
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = UnknownActivityType;

    /// Accepts either the full name or the single-letter code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(kind) = Self::from_code(c) {
                return Ok(kind);
            }
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownActivityType(s.to_string()))
    }
}

/// Error type for unknown activity type strings.
#[derive(Debug, Clone)]
pub struct UnknownActivityType(String);

impl fmt::Display for UnknownActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown activity type: {}", self.0)
    }
}

impl std::error::Error for UnknownActivityType {}

/// Coarse grouping of activity types by the kind of attention they take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FocusCategory {
    Deep,
    Meeting,
    Shallow,
}

impl FocusCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deep => "Deep",
            Self::Meeting => "Meeting",
            Self::Shallow => "Shallow",
        }
    }
}

impl fmt::Display for FocusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats a minute count as `H:MM`.
pub fn format_hours_minutes(minutes: u32) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}
