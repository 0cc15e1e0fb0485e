//! The time block record.

use serde::{Deserialize, Serialize};

use crate::time::{ActivityType, TimeOfDay};

/// Project code used when a block has no `#Project` token.
pub const DEFAULT_PROJECT: &str = "General";

/// A single `start - end` time block.
///
/// Intervals are values: correcting one produces a new interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: TimeOfDay,
    /// Never earlier than `start`.
    pub end: TimeOfDay,
    /// `None` for empty blocks written as a bare `HH:MM - HH:MM`.
    pub activity: Option<ActivityType>,
    pub project: String,
    pub description: String,
}

impl Interval {
    /// An unlabeled block.
    #[must_use]
    pub fn empty(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            start,
            end,
            activity: None,
            project: DEFAULT_PROJECT.to_string(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.start.minutes_until(self.end)
    }

    #[must_use]
    pub const fn is_break(&self) -> bool {
        matches!(self.activity, Some(ActivityType::Break))
    }

    /// A copy of this block ending at `end`.
    #[must_use]
    pub fn with_end(&self, end: TimeOfDay) -> Self {
        Self {
            end,
            ..self.clone()
        }
    }
}
