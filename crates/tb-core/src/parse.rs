//! Line grammar for time blocks.
//!
//! ```text
//! LINE     := TIME WS? "-" WS? TIME [WS LABEL]
//! LABEL    := TYPE ":" [WS PROJECT] [WS DESCRIPTION]
//! TYPE     := "T" | "M" | "C" | "A" | "L" | "B"
//! PROJECT  := "#" NAME | "#Project-" NAME
//! ```
//!
//! Parsing is line-local and total: every line becomes either an [`Interval`]
//! or a [`ParseError`], and a bad line never stops the lines after it.

use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::LineError;
use crate::interval::{DEFAULT_PROJECT, Interval};
use crate::section::SectionLine;
use crate::time::{ActivityType, TimeOfDay};

/// `[[Target]]` or `[[Target|Alias]]`.
static WIKILINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]|]+)(?:\|[^\]]+)?\]\]").unwrap());

const PROJECT_PREFIX: &str = "Project-";

/// A line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub line_number: usize,
    pub raw_text: String,
    #[serde(serialize_with = "serialize_display")]
    pub reason: LineError,
}

fn serialize_display<S: Serializer>(value: &LineError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            LineError::InvalidFormat => write!(
                f,
                "Line {}: {}: '{}'",
                self.line_number, self.reason, self.raw_text
            ),
            _ => write!(f, "Line {}: {}", self.line_number, self.reason),
        }
    }
}

/// Result of parsing every line of a section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedSection {
    /// Successfully parsed blocks in document order.
    pub intervals: Vec<Interval>,
    /// Document line number of each entry in `intervals`.
    pub line_numbers: Vec<usize>,
    /// Malformed lines in document order.
    pub errors: Vec<ParseError>,
}

impl ParsedSection {
    /// Document line number of the interval at `index`.
    pub fn line_number(&self, index: usize) -> Option<usize> {
        self.line_numbers.get(index).copied()
    }
}

/// Splits a leading `HH:MM`-shaped token off `s`.
///
/// Returns `None` if `s` does not start with digits and a colon.
fn take_time_token(s: &str) -> Option<(&str, &str)> {
    let len = s
        .bytes()
        .take_while(|b| b.is_ascii_digit() || *b == b':')
        .count();
    let token = &s[..len];
    let (hh, mm) = token.split_once(':')?;
    if hh.is_empty() || mm.is_empty() {
        return None;
    }
    Some((token, &s[len..]))
}

fn parse_time(token: &str) -> Result<TimeOfDay, LineError> {
    token.parse().map_err(|_| LineError::InvalidTime {
        token: token.to_string(),
    })
}

/// Parses the `START - END` prefix, returning both times and the remaining text.
fn parse_span(line: &str) -> Result<(TimeOfDay, TimeOfDay, &str), LineError> {
    let (start_token, rest) = take_time_token(line).ok_or(LineError::InvalidFormat)?;
    let rest = rest
        .trim_start()
        .strip_prefix('-')
        .ok_or(LineError::InvalidFormat)?
        .trim_start();
    let (end_token, rest) = take_time_token(rest).ok_or(LineError::InvalidFormat)?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return Err(LineError::InvalidFormat);
    }

    let start = parse_time(start_token)?;
    let end = parse_time(end_token)?;
    if end < start {
        return Err(LineError::EndBeforeStart { start, end });
    }
    Ok((start, end, rest))
}

/// Byte range of the end time token in an untrimmed document line.
pub(crate) fn end_time_range(line: &str) -> Option<Range<usize>> {
    let trimmed = line.trim_start();
    let (_, rest) = take_time_token(trimmed)?;
    let after_dash = rest.trim_start().strip_prefix('-')?.trim_start();
    let (end_token, _) = take_time_token(after_dash)?;
    let offset = line.len() - after_dash.len();
    Some(offset..offset + end_token.len())
}

/// Splits a leading `#Name` / `#Project-Name` token off a label body.
fn take_project(body: &str) -> (Option<&str>, &str) {
    let Some(tagged) = body.strip_prefix('#') else {
        return (None, body);
    };
    let end = tagged.find(char::is_whitespace).unwrap_or(tagged.len());
    let (name, rest) = tagged.split_at(end);
    let name = match name.strip_prefix(PROJECT_PREFIX) {
        Some("") => return (None, rest),
        Some(stripped) => stripped,
        None => name,
    };
    if name.is_empty() {
        return (None, body);
    }
    (Some(name), rest)
}

/// Replaces wikilinks with their target page name.
fn strip_wikilinks(text: &str) -> String {
    WIKILINK_RE.replace_all(text, "$1").into_owned()
}

/// Parses a single time block line.
pub fn parse_line(line: &str) -> Result<Interval, LineError> {
    let line = line.trim();
    let (start, end, rest) = parse_span(line)?;

    let label = rest.trim();
    if label.is_empty() {
        return Ok(Interval::empty(start, end));
    }

    let (code, body) = label.split_once(':').ok_or(LineError::InvalidFormat)?;
    if code.is_empty() || !code.chars().all(char::is_alphabetic) {
        return Err(LineError::InvalidFormat);
    }
    let mut chars = code.chars();
    let activity = match (chars.next(), chars.next()) {
        (Some(c), None) => ActivityType::from_code(c),
        _ => None,
    }
    .ok_or_else(|| LineError::InvalidTypeCode {
        code: code.to_string(),
    })?;

    let (project, description) = take_project(body.trim_start());
    Ok(Interval {
        start,
        end,
        activity: Some(activity),
        project: project.unwrap_or(DEFAULT_PROJECT).to_string(),
        description: strip_wikilinks(description).trim().to_string(),
    })
}

/// Parses every section line, separating intervals from malformed lines.
pub fn parse_section(lines: &[SectionLine<'_>]) -> ParsedSection {
    let mut parsed = ParsedSection::default();
    for line in lines {
        match parse_line(line.text) {
            Ok(interval) => {
                parsed.intervals.push(interval);
                parsed.line_numbers.push(line.line_number);
            }
            Err(reason) => {
                tracing::debug!(line = line.line_number, %reason, "malformed time block");
                parsed.errors.push(ParseError {
                    line_number: line.line_number,
                    raw_text: line.text.to_string(),
                    reason,
                });
            }
        }
    }
    tracing::debug!(
        intervals = parsed.intervals.len(),
        errors = parsed.errors.len(),
        "parsed section"
    );
    parsed
}
