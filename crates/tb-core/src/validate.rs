//! Boundary checks between consecutive time blocks.
//!
//! Document order is the chronological claim under test, so nothing is
//! sorted. Each boundary `(i, i + 1)` is exactly one of: perfectly adjacent,
//! a gap, or an overlap. A block that starts before its predecessor starts is
//! additionally reported as out of order.

use serde::Serialize;

use crate::interval::Interval;
use crate::parse::{ParseError, ParsedSection};

/// A structured finding about the interval sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// Idle time between block `between_index` and the next one.
    Gap {
        between_index: usize,
        magnitude_minutes: u32,
    },
    /// Block `between_index` ends after the next block starts.
    Overlap {
        between_index: usize,
        magnitude_minutes: u32,
    },
    /// Block `index` starts earlier than block `index - 1`.
    OutOfOrder { index: usize },
}

impl ValidationIssue {
    /// Only gaps can be closed automatically.
    #[must_use]
    pub const fn is_fixable(&self) -> bool {
        matches!(self, Self::Gap { .. })
    }

    /// Interval indices this finding refers to.
    #[must_use]
    pub const fn indices(&self) -> (usize, usize) {
        match *self {
            Self::Gap { between_index, .. } | Self::Overlap { between_index, .. } => {
                (between_index, between_index + 1)
            }
            Self::OutOfOrder { index } => (index.saturating_sub(1), index),
        }
    }

    /// Interval whose line the message leads with.
    #[must_use]
    pub const fn report_index(&self) -> usize {
        match *self {
            Self::Gap { between_index, .. } | Self::Overlap { between_index, .. } => between_index,
            Self::OutOfOrder { index } => index,
        }
    }

    /// Human-readable message using document line numbers.
    ///
    /// Falls back to 1-based interval positions when line numbers are unknown.
    pub fn describe(&self, intervals: &[Interval], line_numbers: &[usize]) -> String {
        let (left, right) = self.indices();
        let line_of = |idx: usize| line_numbers.get(idx).copied().unwrap_or(idx + 1);
        let time = |idx: usize, end: bool| {
            intervals
                .get(idx)
                .map(|iv| (if end { iv.end } else { iv.start }).to_string())
                .unwrap_or_default()
        };

        match *self {
            Self::Gap {
                magnitude_minutes, ..
            } => format!(
                "Lines {}-{}: Gap of {magnitude_minutes} minutes between {} and {}",
                line_of(left),
                line_of(right),
                time(left, true),
                time(right, false),
            ),
            Self::Overlap {
                magnitude_minutes, ..
            } => format!(
                "Lines {}-{}: Overlapping time blocks by {magnitude_minutes} minutes ({} > {})",
                line_of(left),
                line_of(right),
                time(left, true),
                time(right, false),
            ),
            Self::OutOfOrder { .. } => format!(
                "Line {}: Time block starts at {}, before the previous block starts at {}",
                line_of(right),
                time(right, false),
                time(left, false),
            ),
        }
    }
}

/// Checks every boundary between consecutive intervals.
pub fn validate(intervals: &[Interval]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (i, pair) in intervals.windows(2).enumerate() {
        let (current, next) = (&pair[0], &pair[1]);

        if current.end < next.start {
            issues.push(ValidationIssue::Gap {
                between_index: i,
                magnitude_minutes: current.end.minutes_until(next.start),
            });
        } else if current.end > next.start {
            issues.push(ValidationIssue::Overlap {
                between_index: i,
                magnitude_minutes: next.start.minutes_until(current.end),
            });
        }

        if next.start < current.start {
            issues.push(ValidationIssue::OutOfOrder { index: i + 1 });
        }
    }

    if !issues.is_empty() {
        tracing::debug!(
            intervals = intervals.len(),
            issues = issues.len(),
            "validation found issues"
        );
    }
    issues
}

/// Everything wrong with one document's time section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub parse_errors: Vec<ParseError>,
}

impl ValidationReport {
    /// Validates a parsed section, carrying its parse errors along.
    pub fn for_section(section: &ParsedSection) -> Self {
        Self {
            issues: validate(&section.intervals),
            parse_errors: section.errors.clone(),
        }
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.parse_errors.is_empty()
    }

    pub fn gap_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_fixable()).count()
    }

    /// All findings as messages, in document line order.
    pub fn messages(&self, section: &ParsedSection) -> Vec<String> {
        let mut keyed: Vec<(usize, String)> = self
            .parse_errors
            .iter()
            .map(|e| (e.line_number, e.to_string()))
            .chain(self.issues.iter().map(|issue| {
                let line = section.line_number(issue.report_index()).unwrap_or(0);
                (line, issue.describe(&section.intervals, &section.line_numbers))
            }))
            .collect();
        keyed.sort_by_key(|(line, _)| *line);
        keyed.into_iter().map(|(_, message)| message).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_line;
    use crate::section::SectionLine;

    fn blocks(lines: &[&str]) -> Vec<Interval> {
        lines.iter().map(|l| parse_line(l).unwrap()).collect()
    }

    #[test]
    fn contiguous_blocks_have_no_issues() {
        let intervals = blocks(&[
            "08:00 - 09:00 T: #General Valid task",
            "09:00 - 10:30 M: #Team Meeting",
            "10:30 - 12:00 T: #Project-Work Work on project",
        ]);
        assert!(validate(&intervals).is_empty());
    }

    #[test]
    fn zero_or_one_block_has_no_issues() {
        assert!(validate(&[]).is_empty());
        assert!(validate(&blocks(&["09:00 - 17:00"])).is_empty());
    }

    #[test]
    fn detects_gap() {
        let intervals = blocks(&["08:00 - 09:00 T: Task 1", "09:30 - 10:30 T: Task 2"]);
        assert_eq!(
            validate(&intervals),
            vec![ValidationIssue::Gap {
                between_index: 0,
                magnitude_minutes: 30
            }]
        );
    }

    #[test]
    fn detects_overlap() {
        let intervals = blocks(&["08:00 - 09:00 T: Task 1", "08:30 - 09:30 T: Task 2"]);
        assert_eq!(
            validate(&intervals),
            vec![ValidationIssue::Overlap {
                between_index: 0,
                magnitude_minutes: 30
            }]
        );
    }

    #[test]
    fn block_overlapping_both_neighbours_yields_two_issues() {
        let intervals = blocks(&["08:00 - 09:00", "08:45 - 10:15", "10:00 - 11:00"]);
        assert_eq!(
            validate(&intervals),
            vec![
                ValidationIssue::Overlap {
                    between_index: 0,
                    magnitude_minutes: 15
                },
                ValidationIssue::Overlap {
                    between_index: 1,
                    magnitude_minutes: 15
                },
            ]
        );
    }

    #[test]
    fn regressing_start_is_out_of_order() {
        let intervals = blocks(&["09:00 - 10:00", "08:00 - 08:30"]);
        assert_eq!(
            validate(&intervals),
            vec![
                ValidationIssue::Overlap {
                    between_index: 0,
                    magnitude_minutes: 120
                },
                ValidationIssue::OutOfOrder { index: 1 },
            ]
        );
    }

    #[test]
    fn day_edges_are_not_checked() {
        let intervals = blocks(&["00:00 - 00:30", "00:30 - 23:59"]);
        assert!(validate(&intervals).is_empty());
    }

    #[test]
    fn fixable_and_indices() {
        let gap = ValidationIssue::Gap {
            between_index: 2,
            magnitude_minutes: 5,
        };
        assert!(gap.is_fixable());
        assert_eq!(gap.indices(), (2, 3));
        let ooo = ValidationIssue::OutOfOrder { index: 4 };
        assert!(!ooo.is_fixable());
        assert_eq!(ooo.indices(), (3, 4));
        assert_eq!(gap.report_index(), 2);
        assert_eq!(ooo.report_index(), 4);
    }

    #[test]
    fn report_messages_in_line_order() {
        let texts = [
            "08:00 - 09:00 T: #General Task",
            "09:00 - 10:00",
            "bogus",
            "10:30 - 11:00 M: #Team Meeting",
            "10:45 - 12:00",
        ];
        let lines: Vec<_> = texts
            .iter()
            .copied()
            .enumerate()
            .map(|(i, text)| SectionLine {
                line_number: i + 1,
                text,
            })
            .collect();
        let section = crate::parse::parse_section(&lines);
        let report = ValidationReport::for_section(&section);

        assert!(!report.is_clean());
        assert_eq!(report.gap_count(), 1);
        let messages = report.messages(&section).join("\n");
        insta::assert_snapshot!(messages, @r"
        Lines 2-4: Gap of 30 minutes between 10:00 and 10:30
        Line 3: Invalid format: 'bogus'
        Lines 4-5: Overlapping time blocks by 15 minutes (11:00 > 10:45)
        ");
    }

    #[test]
    fn out_of_order_sorts_by_its_own_line() {
        let texts = ["09:00 - 10:00", "bogus", "08:00 - 08:30"];
        let lines: Vec<_> = texts
            .iter()
            .copied()
            .enumerate()
            .map(|(i, text)| SectionLine {
                line_number: i + 1,
                text,
            })
            .collect();
        let section = crate::parse::parse_section(&lines);
        let report = ValidationReport::for_section(&section);

        let messages = report.messages(&section).join("\n");
        insta::assert_snapshot!(messages, @r"
        Lines 1-3: Overlapping time blocks by 120 minutes (10:00 > 08:00)
        Line 2: Invalid format: 'bogus'
        Line 3: Time block starts at 08:00, before the previous block starts at 09:00
        ");
    }

    #[test]
    fn out_of_order_message() {
        let intervals = blocks(&["09:00 - 10:00", "08:00 - 08:30"]);
        let issue = ValidationIssue::OutOfOrder { index: 1 };
        assert_eq!(
            issue.describe(&intervals, &[4, 5]),
            "Line 5: Time block starts at 08:00, before the previous block starts at 09:00"
        );
    }

    #[test]
    fn issues_serialize_tagged() {
        let issue = ValidationIssue::Gap {
            between_index: 0,
            magnitude_minutes: 30,
        };
        let json = serde_json::to_string(&issue).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"gap","between_index":0,"magnitude_minutes":30}"#
        );
    }
}
