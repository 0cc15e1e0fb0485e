//! Shared utilities for CLI commands: date selection and note discovery.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use rayon::prelude::*;
use regex::Regex;
use tb_core::DailyNote;

use crate::cli::Selection;
use crate::config::Config;

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Daily notes are named after their date.
static NOTE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}\.md$").unwrap());

/// Conservative bound for relative date parsing (~1000 years in days).
const MAX_RELATIVE_DAYS: i64 = 1000 * 365;

/// Parse a date as `YYYY-MM-DD`, `today`, `yesterday`, or relative to `today`.
///
/// Supports:
/// - ISO 8601: "2025-01-29"
/// - Relative: "3 days ago", "1 week ago"
pub fn parse_date(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = s.trim();
    match s {
        "today" => return Ok(today),
        "yesterday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let Some(caps) = RELATIVE_DATE_RE.captures(s) else {
        anyhow::bail!(
            "Invalid date: {s}. Use YYYY-MM-DD (e.g., 2025-01-29), today, yesterday, or relative (e.g., '3 days ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;

    let (max_for_unit, days_per_unit) = match &caps[2] {
        "day" => (MAX_RELATIVE_DAYS, 1),
        "week" => (MAX_RELATIVE_DAYS / 7, 7),
        unit => anyhow::bail!("Unknown date unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative date value too large: {n} {}", &caps[2]);
    }

    Ok(today - Duration::days(n * days_per_unit))
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateRange {
    pub const fn day(date: NaiveDate) -> Self {
        Self {
            first: date,
            last: date,
        }
    }

    pub fn is_single_day(self) -> bool {
        self.first == self.last
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        self.first.iter_days().take_while(move |d| *d <= self.last)
    }
}

/// Monday through Sunday of the week containing `date`.
fn week_of(date: NaiveDate) -> DateRange {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    DateRange {
        first: monday,
        last: monday + Duration::days(6),
    }
}

/// First through last day of the month containing `date`.
fn month_of(date: NaiveDate) -> DateRange {
    let first = date - Duration::days(i64::from(date.day0()));
    let next_month = first + Duration::days(31);
    let next_first = next_month - Duration::days(i64::from(next_month.day0()));
    DateRange {
        first,
        last: next_first - Duration::days(1),
    }
}

/// January 1st through December 31st of the year containing `date`.
fn year_of(date: NaiveDate) -> DateRange {
    let first = date - Duration::days(i64::from(date.ordinal0()));
    let next_year = first + Duration::days(366);
    let next_first = next_year - Duration::days(i64::from(next_year.ordinal0()));
    DateRange {
        first,
        last: next_first - Duration::days(1),
    }
}

/// Resolves the date flags of `selection` relative to `today`.
pub fn resolve_range(selection: &Selection, today: NaiveDate) -> Result<DateRange> {
    if let Some(date) = &selection.date {
        return Ok(DateRange::day(parse_date(date, today)?));
    }

    if let Some(from) = &selection.from {
        let first = parse_date(from, today)?;
        let last = match &selection.to {
            Some(to) => parse_date(to, today)?,
            None => today,
        };
        if last < first {
            anyhow::bail!("--to ({last}) is before --from ({first})");
        }
        return Ok(DateRange { first, last });
    }

    let range = if selection.this_week {
        week_of(today)
    } else if selection.last_week {
        week_of(today - Duration::days(7))
    } else if selection.this_month {
        month_of(today)
    } else if selection.last_month {
        month_of(month_of(today).first - Duration::days(1))
    } else if selection.this_year {
        year_of(today)
    } else if selection.last_year {
        year_of(year_of(today).first - Duration::days(1))
    } else if selection.yesterday {
        DateRange::day(today - Duration::days(1))
    } else {
        DateRange::day(today)
    };
    Ok(range)
}

/// Whether `path` is named like a daily note.
pub fn is_note_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| NOTE_NAME_RE.is_match(n))
}

/// Path of the note for `date` inside `notes_dir`.
pub fn note_path(notes_dir: &Path, date: NaiveDate) -> PathBuf {
    notes_dir.join(format!("{}.md", date.format("%Y-%m-%d")))
}

/// A note read from disk.
#[derive(Debug, Clone)]
pub struct NoteFile {
    pub path: PathBuf,
    pub text: String,
}

impl NoteFile {
    fn read(path: PathBuf) -> Result<Self> {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self { path, text })
    }

    /// File name used to label output.
    pub fn name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }
}

/// Reads the notes chosen by `selection`, in date order.
///
/// A single day or explicit file must exist. Days without a note are skipped
/// when a longer range is selected.
pub fn load_notes(selection: &Selection, config: &Config, today: NaiveDate) -> Result<Vec<NoteFile>> {
    let notes_dir = selection.notes_dir.as_deref().unwrap_or(&config.notes_dir);

    if let Some(file) = &selection.file {
        if !is_note_name(file) {
            anyhow::bail!(
                "Filename must be in the format YYYY-MM-DD.md (optionally with a directory path): {}",
                file.display()
            );
        }
        let path = if file.is_absolute() || file.exists() {
            file.clone()
        } else {
            notes_dir.join(file)
        };
        if !path.exists() {
            anyhow::bail!("File '{}' does not exist.", path.display());
        }
        return Ok(vec![NoteFile::read(path)?]);
    }

    let range = resolve_range(selection, today)?;
    tracing::debug!(first = %range.first, last = %range.last, dir = ?notes_dir, "resolved date range");

    let paths: Vec<PathBuf> = range
        .days()
        .map(|date| note_path(notes_dir, date))
        .filter(|path| {
            let exists = path.is_file();
            if !exists {
                tracing::debug!(path = ?path, "no note for day");
            }
            exists
        })
        .collect();

    if paths.is_empty() && range.is_single_day() {
        anyhow::bail!(
            "File '{}' does not exist.",
            note_path(notes_dir, range.first).display()
        );
    }

    paths.into_par_iter().map(NoteFile::read).collect()
}

/// Parses every note, skipping those without a time section.
pub fn parse_notes<'a>(notes: &'a [NoteFile], marker: &str) -> Vec<(&'a NoteFile, DailyNote<'a>)> {
    notes
        .par_iter()
        .filter_map(|note| match DailyNote::parse_with_marker(&note.text, marker) {
            Ok(daily) => Some((note, daily)),
            Err(e) => {
                tracing::warn!(path = ?note.path, error = %e, "skipping note");
                None
            }
        })
        .collect()
}
