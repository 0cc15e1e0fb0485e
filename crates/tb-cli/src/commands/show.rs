//! Show command for listing parsed time blocks.

use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;
use tb_core::{Interval, format_hours_minutes};

use super::util::{NoteFile, parse_notes};
use crate::config::Config;

/// Parsed blocks of one note.
#[derive(Debug, Serialize)]
pub struct NoteBlocks {
    pub file: String,
    pub blocks: Vec<Interval>,
    pub malformed_lines: usize,
}

pub fn collect(notes: &[NoteFile], marker: &str) -> Vec<NoteBlocks> {
    parse_notes(notes, marker)
        .into_iter()
        .map(|(note, daily)| NoteBlocks {
            file: note.name(),
            blocks: daily.intervals().to_vec(),
            malformed_lines: daily.section().errors.len(),
        })
        .collect()
}

/// Formats each note's blocks as a table.
pub fn format_blocks(notes: &[NoteBlocks]) -> String {
    let mut output = String::new();
    for (i, note) in notes.iter().enumerate() {
        if i > 0 {
            writeln!(output).unwrap();
        }
        writeln!(output, "{}", note.file).unwrap();

        if note.blocks.is_empty() {
            writeln!(output, "  (no time blocks)").unwrap();
        }
        for block in &note.blocks {
            let activity = block.activity.map_or("", |a| a.as_str());
            let line = format!(
                "  {}-{}  {:>5}  {activity:<8}  {:<12}  {}",
                block.start,
                block.end,
                format_hours_minutes(block.duration_minutes()),
                block.project,
                block.description,
            );
            writeln!(output, "{}", line.trim_end()).unwrap();
        }

        let total: u32 = note.blocks.iter().map(Interval::duration_minutes).sum();
        writeln!(output, "  Total: {}", format_hours_minutes(total)).unwrap();
        if note.malformed_lines > 0 {
            writeln!(
                output,
                "  {} malformed {} skipped (see 'tb validate')",
                note.malformed_lines,
                if note.malformed_lines == 1 { "line" } else { "lines" }
            )
            .unwrap();
        }
    }
    output
}

/// Runs the show command.
pub fn run(notes: &[NoteFile], config: &Config, json: bool) -> Result<()> {
    let blocks = collect(notes, &config.section_marker);
    if json {
        println!("{}", serde_json::to_string_pretty(&blocks)?);
    } else {
        print!("{}", format_blocks(&blocks));
    }
    Ok(())
}
