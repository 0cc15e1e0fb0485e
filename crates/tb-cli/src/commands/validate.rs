//! Validate command for reporting problems in time sections.

use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;
use tb_core::ValidationReport;

use super::util::{NoteFile, parse_notes};
use crate::config::Config;

/// Findings for one note.
#[derive(Debug, Serialize)]
pub struct NoteValidation {
    pub file: String,
    #[serde(flatten)]
    pub report: ValidationReport,
    /// Findings rendered in document line order.
    pub messages: Vec<String>,
}

impl NoteValidation {
    pub fn is_clean(&self) -> bool {
        self.report.is_clean()
    }
}

/// Validates each note that has a time section.
pub fn check(notes: &[NoteFile], marker: &str) -> Vec<NoteValidation> {
    parse_notes(notes, marker)
        .into_iter()
        .map(|(note, daily)| {
            let report = daily.validate();
            let messages = report.messages(daily.section());
            NoteValidation {
                file: note.name(),
                report,
                messages,
            }
        })
        .collect()
}

/// Formats the human-readable validation output.
pub fn format_validation(results: &[NoteValidation]) -> String {
    let mut output = String::new();
    for result in results {
        if result.is_clean() {
            writeln!(output, "{}: OK", result.file).unwrap();
            continue;
        }
        writeln!(output, "{}:", result.file).unwrap();
        for message in &result.messages {
            writeln!(output, "  {message}").unwrap();
        }
    }

    let problems: usize = results.iter().map(|r| r.messages.len()).sum();
    if problems > 0 {
        let gaps: usize = results.iter().map(|r| r.report.gap_count()).sum();
        writeln!(output).unwrap();
        writeln!(
            output,
            "{problems} {} found ({gaps} fixable with 'tb fix')",
            if problems == 1 { "problem" } else { "problems" }
        )
        .unwrap();
    }
    output
}

/// Runs the validate command. Returns `false` if any note has findings.
pub fn run(notes: &[NoteFile], config: &Config, json: bool) -> Result<bool> {
    let results = check(notes, &config.section_marker);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", format_validation(&results));
    }

    Ok(results.iter().all(NoteValidation::is_clean))
}
