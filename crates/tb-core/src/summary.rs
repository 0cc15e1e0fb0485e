//! Aggregating time blocks into per-project, per-type, and per-focus totals.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::interval::Interval;
use crate::time::{ActivityType, FocusCategory};

/// Which blocks count toward a summary.
#[derive(Debug, Clone, Default)]
pub struct SummaryConfig {
    /// Count `Break` blocks. Off by default.
    pub include_breaks: bool,
    /// Only descriptions matching this pattern are counted.
    pub filter_pattern: Option<Regex>,
    /// Descriptions matching this pattern are not counted.
    pub ignore_pattern: Option<Regex>,
    /// Skip blocks whose description is empty or whitespace.
    pub ignore_empty_descriptions: bool,
}

impl SummaryConfig {
    /// Compiles the optional filter and ignore patterns.
    pub fn from_patterns(
        filter: Option<&str>,
        ignore: Option<&str>,
        ignore_case: bool,
    ) -> Result<Self, regex::Error> {
        let compile = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(ignore_case)
                .build()
        };
        Ok(Self {
            filter_pattern: filter.map(&compile).transpose()?,
            ignore_pattern: ignore.map(&compile).transpose()?,
            ..Self::default()
        })
    }

    /// Whether `interval` passes every configured predicate.
    ///
    /// Applied in order: break exclusion, filter, ignore, empty description.
    pub fn counts(&self, interval: &Interval) -> bool {
        if interval.is_break() && !self.include_breaks {
            return false;
        }
        if let Some(filter) = &self.filter_pattern {
            if !filter.is_match(&interval.description) {
                return false;
            }
        }
        if let Some(ignore) = &self.ignore_pattern {
            if ignore.is_match(&interval.description) {
                return false;
            }
        }
        !(self.ignore_empty_descriptions && interval.description.trim().is_empty())
    }
}

/// Total time for one project code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub project_code: String,
    pub total_minutes: u32,
    pub percent_of_grand_total: f64,
}

/// Per-project totals, largest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryReport {
    pub rows: Vec<SummaryRow>,
    pub grand_total_minutes: u32,
}

/// Total time for one activity type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeTotal {
    pub activity: ActivityType,
    pub total_minutes: u32,
    pub percent_of_grand_total: f64,
}

/// Total time for one focus category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusTotal {
    pub focus: FocusCategory,
    pub total_minutes: u32,
}

/// Share of `total` taken by `part`, zero when nothing was counted.
pub fn percent(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * f64::from(part) / f64::from(total)
    }
}

/// Groups counted blocks by project code.
///
/// Rows are ordered by descending minutes, ties by ascending project code.
pub fn summarize<'a, I>(intervals: I, config: &SummaryConfig) -> SummaryReport
where
    I: IntoIterator<Item = &'a Interval>,
{
    let mut totals: BTreeMap<&str, u32> = BTreeMap::new();
    for interval in intervals.into_iter().filter(|iv| config.counts(iv)) {
        *totals.entry(interval.project.as_str()).or_default() += interval.duration_minutes();
    }

    let grand_total_minutes = totals.values().sum();
    let mut rows: Vec<SummaryRow> = totals
        .into_iter()
        .map(|(project, minutes)| SummaryRow {
            project_code: project.to_string(),
            total_minutes: minutes,
            percent_of_grand_total: percent(minutes, grand_total_minutes),
        })
        .collect();
    // BTreeMap iteration is already ordered by project code; the sort is stable.
    rows.sort_by(|a, b| b.total_minutes.cmp(&a.total_minutes));

    SummaryReport {
        rows,
        grand_total_minutes,
    }
}

/// Groups counted, labeled blocks by activity type.
///
/// Empty blocks have no type and are left out.
pub fn summarize_by_type<'a, I>(intervals: I, config: &SummaryConfig) -> Vec<TypeTotal>
where
    I: IntoIterator<Item = &'a Interval>,
{
    let mut totals: BTreeMap<ActivityType, u32> = BTreeMap::new();
    for interval in intervals.into_iter().filter(|iv| config.counts(iv)) {
        if let Some(activity) = interval.activity {
            *totals.entry(activity).or_default() += interval.duration_minutes();
        }
    }

    let grand_total: u32 = totals.values().sum();
    let mut rows: Vec<TypeTotal> = totals
        .into_iter()
        .map(|(activity, minutes)| TypeTotal {
            activity,
            total_minutes: minutes,
            percent_of_grand_total: percent(minutes, grand_total),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_minutes
            .cmp(&a.total_minutes)
            .then_with(|| a.activity.as_str().cmp(b.activity.as_str()))
    });
    rows
}

/// Folds type totals into focus categories. Breaks belong to none.
pub fn summarize_by_focus(type_totals: &[TypeTotal]) -> Vec<FocusTotal> {
    let mut totals: BTreeMap<FocusCategory, u32> = BTreeMap::new();
    for row in type_totals {
        if let Some(focus) = row.activity.focus() {
            *totals.entry(focus).or_default() += row.total_minutes;
        }
    }

    let mut rows: Vec<FocusTotal> = totals
        .into_iter()
        .map(|(focus, total_minutes)| FocusTotal {
            focus,
            total_minutes,
        })
        .collect();
    rows.sort_by(|a, b| b.total_minutes.cmp(&a.total_minutes));
    rows
}
