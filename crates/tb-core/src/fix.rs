//! Closing gaps between time blocks.
//!
//! A gap at boundary `i` is closed by extending block `i` to the start of
//! block `i + 1`. Only block `i`'s end changes, and it changes to exactly its
//! right neighbour's unmodified start, so closing one gap never opens or
//! closes another. Overlaps and ordering problems need a human and are passed
//! through untouched, as is any gap whose block is part of one of them.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::interval::Interval;
use crate::parse::{ParsedSection, end_time_range};
use crate::time::TimeOfDay;
use crate::validate::{ValidationIssue, validate};

/// Corrected intervals plus what was and was not fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixOutcome {
    pub intervals: Vec<Interval>,
    /// Gaps that were closed.
    pub fixed: Vec<ValidationIssue>,
    /// Findings that still need manual resolution, in their original order.
    pub residual: Vec<ValidationIssue>,
}

impl FixOutcome {
    pub fn gaps_fixed(&self) -> usize {
        self.fixed.len()
    }

    #[must_use]
    pub fn needs_manual_resolution(&self) -> bool {
        !self.residual.is_empty()
    }

    /// One-line summary such as `2 gaps fixed, 1 issue requires manual resolution`.
    pub fn summary(&self) -> String {
        let fixed = self.fixed.len();
        let residual = self.residual.len();
        format!(
            "{fixed} {} fixed, {residual} {} manual resolution",
            if fixed == 1 { "gap" } else { "gaps" },
            if residual == 1 {
                "issue requires"
            } else {
                "issues require"
            },
        )
    }
}

/// Applies gap fixes for `issues` found in `intervals`.
///
/// Gap findings that no longer describe a gap in `intervals` are dropped.
pub fn fix_gaps(intervals: &[Interval], issues: &[ValidationIssue]) -> FixOutcome {
    // Blocks on either side of an unfixable finding must stay as written.
    let pinned: HashSet<usize> = issues
        .iter()
        .filter(|issue| !issue.is_fixable())
        .flat_map(|issue| {
            let (left, right) = issue.indices();
            [left, right]
        })
        .collect();

    let mut corrected = intervals.to_vec();
    let mut fixed = Vec::new();
    let mut residual = Vec::new();

    for issue in issues {
        let ValidationIssue::Gap { between_index, .. } = *issue else {
            residual.push(*issue);
            continue;
        };

        let (Some(current), Some(next)) = (
            intervals.get(between_index),
            intervals.get(between_index + 1),
        ) else {
            tracing::debug!(between_index, "ignoring gap outside interval range");
            continue;
        };
        if current.end >= next.start {
            tracing::debug!(between_index, "ignoring stale gap");
            continue;
        }
        if pinned.contains(&between_index) {
            tracing::debug!(between_index, "gap borders an overlap; leaving for manual fix");
            residual.push(*issue);
            continue;
        }

        corrected[between_index] = current.with_end(next.start);
        fixed.push(*issue);
    }

    tracing::debug!(
        fixed = fixed.len(),
        residual = residual.len(),
        "applied gap fixes"
    );
    FixOutcome {
        intervals: corrected,
        fixed,
        residual,
    }
}

/// Validates `intervals` and closes every fixable gap.
pub fn fix(intervals: &[Interval]) -> FixOutcome {
    fix_gaps(intervals, &validate(intervals))
}

/// Rewrites the end times of corrected blocks inside `document`.
///
/// Only the end token of each changed block's line is replaced. Every other
/// byte of the document, including line endings, is preserved.
pub fn rewrite_document(document: &str, section: &ParsedSection, corrected: &[Interval]) -> String {
    let new_ends: BTreeMap<usize, TimeOfDay> = section
        .intervals
        .iter()
        .zip(corrected)
        .zip(&section.line_numbers)
        .filter(|((original, fixed), _)| original.end != fixed.end)
        .map(|((_, fixed), &line_number)| (line_number, fixed.end))
        .collect();

    if new_ends.is_empty() {
        return document.to_string();
    }

    let mut output = String::with_capacity(document.len());
    for (idx, line) in document.split_inclusive('\n').enumerate() {
        match (new_ends.get(&(idx + 1)), end_time_range(line)) {
            (Some(end), Some(range)) => {
                output.push_str(&line[..range.start]);
                output.push_str(&end.to_string());
                output.push_str(&line[range.end..]);
            }
            _ => output.push_str(line),
        }
    }
    output
}
