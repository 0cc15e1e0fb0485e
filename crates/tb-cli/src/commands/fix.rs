//! Fix command for closing gaps between time blocks.
//!
//! Gaps are closed by extending the earlier block. Overlaps and out-of-order
//! blocks are listed for manual resolution. Changed notes are replaced
//! atomically unless `--dry-run` is given.

use std::fmt::Write;

use anyhow::{Context, Result};
use tb_core::{FixOutcome, extract_section, write_atomically};

use super::util::{NoteFile, parse_notes};
use crate::config::Config;

/// What fixing one note would change.
#[derive(Debug)]
pub struct PlannedFix<'a> {
    pub note: &'a NoteFile,
    pub outcome: FixOutcome,
    /// Findings still needing a manual edit, as messages.
    pub manual: Vec<String>,
    /// The rewritten note, if any gap was closed.
    pub fixed_text: Option<String>,
}

/// Computes the fixes for every note that has a time section.
pub fn plan<'a>(notes: &'a [NoteFile], marker: &str) -> Vec<PlannedFix<'a>> {
    parse_notes(notes, marker)
        .into_iter()
        .map(|(note, daily)| {
            let outcome = daily.fix();
            let manual = outcome
                .residual
                .iter()
                .map(|issue| issue.describe(&outcome.intervals, &daily.section().line_numbers))
                .collect();
            let fixed_text = daily.fixed_text(&outcome);
            PlannedFix {
                note,
                outcome,
                manual,
                fixed_text,
            }
        })
        .collect()
}

/// Formats the outcome of each planned fix.
///
/// With `marker`, the corrected time section of each changed note is included.
pub fn format_fixes(fixes: &[PlannedFix<'_>], marker: Option<&str>) -> Result<String> {
    let mut output = String::new();
    for fix in fixes {
        writeln!(output, "{}: {}", fix.note.name(), fix.outcome.summary()).unwrap();
        for message in &fix.manual {
            writeln!(output, "  {message}").unwrap();
        }

        let (Some(marker), Some(text)) = (marker, &fix.fixed_text) else {
            continue;
        };
        let lines = extract_section(text, marker)
            .with_context(|| format!("corrected {} lost its time section", fix.note.name()))?;
        writeln!(output, "  {marker}").unwrap();
        for line in lines {
            writeln!(output, "  {}", line.text).unwrap();
        }
    }
    Ok(output)
}

/// Runs the fix command.
pub fn run(notes: &[NoteFile], config: &Config, dry_run: bool) -> Result<()> {
    let fixes = plan(notes, &config.section_marker);

    if dry_run {
        print!(
            "{}",
            format_fixes(&fixes, Some(config.section_marker.as_str()))?
        );
        return Ok(());
    }

    for fix in &fixes {
        let Some(text) = &fix.fixed_text else {
            continue;
        };
        write_atomically(&fix.note.path, text)
            .with_context(|| format!("failed to rewrite {}", fix.note.path.display()))?;
        tracing::debug!(path = ?fix.note.path, gaps = fix.outcome.gaps_fixed(), "fixed note");
    }

    print!("{}", format_fixes(&fixes, None)?);
    Ok(())
}
