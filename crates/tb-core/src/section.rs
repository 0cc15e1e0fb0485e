//! Locating the time-block section inside a markdown daily note.

use serde::Serialize;

use crate::error::MissingSectionError;

/// Heading that opens the time-block section by default.
pub const TIME_SECTION_MARKER: &str = "## Time";

/// A non-blank line of the section body with its 1-based document line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionLine<'a> {
    pub line_number: usize,
    /// Line content with surrounding whitespace removed.
    pub text: &'a str,
}

/// Heading level of a markdown line, or `None` if it is not a heading.
///
/// A heading is one or more `#` followed by whitespace or end of line.
fn heading_level(line: &str) -> Option<usize> {
    let trimmed = line.trim();
    let level = trimmed.bytes().take_while(|&b| b == b'#').count();
    if level == 0 {
        return None;
    }
    match trimmed[level..].chars().next() {
        None => Some(level),
        Some(c) if c.is_whitespace() => Some(level),
        Some(_) => None,
    }
}

/// Extracts the body of the first section whose heading equals `marker`.
///
/// The body runs until the next heading of equal or higher level (fewer or
/// equal `#`), or the end of the document. Blank lines are skipped.
pub fn extract_section<'a>(
    document: &'a str,
    marker: &str,
) -> Result<Vec<SectionLine<'a>>, MissingSectionError> {
    let marker = marker.trim();
    let marker_level = heading_level(marker).unwrap_or(usize::MAX);

    let mut lines = document.lines().enumerate();
    let found = lines.by_ref().any(|(_, line)| line.trim() == marker);
    if !found {
        return Err(MissingSectionError {
            marker: marker.to_string(),
        });
    }

    let body = lines
        .take_while(|(_, line)| heading_level(line).is_none_or(|level| level > marker_level))
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| SectionLine {
            line_number: idx + 1,
            text: line.trim(),
        })
        .collect::<Vec<_>>();

    tracing::debug!(marker, lines = body.len(), "extracted section");
    Ok(body)
}
