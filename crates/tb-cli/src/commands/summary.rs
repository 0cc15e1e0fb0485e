//! Summary command for totalling time per project.
//!
//! This module implements `tb summary` over one or more notes with optional
//! per-type and per-focus breakdowns, and output formats (table, CSV, TSV, JSON).

use std::fmt::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use tb_core::{
    FocusTotal, SummaryConfig, SummaryReport, TypeTotal, format_hours_minutes, summarize,
    summarize_by_focus, summarize_by_type,
};

use super::util::{NoteFile, parse_notes};
use crate::cli::{FilterArgs, OutputFormat};
use crate::config::Config;

/// How the summary is broken down and rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryOptions {
    pub by_type: bool,
    pub by_focus: bool,
    pub json: bool,
    pub format: OutputFormat,
}

/// Combines CLI filter flags with configured defaults.
///
/// A flag can only switch an option on.
pub fn build_config(filters: &FilterArgs, config: &Config) -> Result<SummaryConfig> {
    let mut summary = SummaryConfig::from_patterns(
        filters.filter.as_deref(),
        filters.ignore.as_deref(),
        filters.ignore_case,
    )
    .context("invalid --filter or --ignore pattern")?;
    summary.include_breaks = filters.include_breaks || config.include_breaks;
    summary.ignore_empty_descriptions = filters.ignore_empty || config.ignore_empty;
    Ok(summary)
}

/// Totals over every selected note.
#[derive(Debug, Serialize)]
pub struct Summary {
    #[serde(flatten)]
    pub report: SummaryReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_type: Option<Vec<TypeTotal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_focus: Option<Vec<FocusTotal>>,
    /// Notes that contributed at least one counted block.
    pub days: usize,
    pub average_minutes_per_day: u32,
}

/// Parses the notes in parallel and totals their blocks.
pub fn compute(
    notes: &[NoteFile],
    marker: &str,
    config: &SummaryConfig,
    options: SummaryOptions,
) -> Summary {
    let parsed = parse_notes(notes, marker);
    for (note, daily) in &parsed {
        let errors = daily.section().errors.len();
        if errors > 0 {
            tracing::warn!(path = ?note.path, errors, "malformed time blocks left out of summary");
        }
    }

    let all = || parsed.iter().flat_map(|(_, daily)| daily.intervals());
    let report = summarize(all(), config);
    let type_totals = summarize_by_type(all(), config);

    let days = parsed
        .iter()
        .filter(|(_, daily)| daily.intervals().iter().any(|iv| config.counts(iv)))
        .count();
    let average_minutes_per_day = u32::try_from(days)
        .ok()
        .filter(|&d| d > 0)
        .map_or(0, |d| report.grand_total_minutes / d);

    Summary {
        report,
        by_focus: options.by_focus.then(|| summarize_by_focus(&type_totals)),
        by_type: options.by_type.then_some(type_totals),
        days,
        average_minutes_per_day,
    }
}

/// Writes one aligned `name  H:MM  pct` table.
fn write_table(output: &mut String, heading: &str, rows: &[(String, u32, Option<f64>)]) {
    let width = rows
        .iter()
        .map(|(name, _, _)| name.chars().count())
        .chain(std::iter::once(heading.len()))
        .max()
        .unwrap_or_default();

    writeln!(output, "{heading:<width$}  {:>7}  {:>6}", "Time", "%").unwrap();
    writeln!(output, "{}  {}  {}", "-".repeat(width), "-".repeat(7), "-".repeat(6)).unwrap();
    for (name, minutes, pct) in rows {
        let time = format_hours_minutes(*minutes);
        match pct {
            Some(pct) => writeln!(output, "{name:<width$}  {time:>7}  {pct:>5.1}%").unwrap(),
            None => writeln!(output, "{name:<width$}  {time:>7}").unwrap(),
        }
    }
}

/// Formats the human-readable summary.
pub fn format_summary(summary: &Summary) -> String {
    let mut output = String::new();

    if summary.report.rows.is_empty() {
        writeln!(output, "No activities match the filter.").unwrap();
        return output;
    }

    let projects: Vec<_> = summary
        .report
        .rows
        .iter()
        .map(|r| {
            (
                r.project_code.clone(),
                r.total_minutes,
                Some(r.percent_of_grand_total),
            )
        })
        .collect();
    write_table(&mut output, "Project", &projects);

    if let Some(by_type) = &summary.by_type {
        let rows: Vec<_> = by_type
            .iter()
            .map(|t| {
                (
                    t.activity.to_string(),
                    t.total_minutes,
                    Some(t.percent_of_grand_total),
                )
            })
            .collect();
        writeln!(output).unwrap();
        write_table(&mut output, "Type", &rows);
    }

    if let Some(by_focus) = &summary.by_focus {
        let rows: Vec<_> = by_focus
            .iter()
            .map(|f| (f.focus.to_string(), f.total_minutes, None))
            .collect();
        writeln!(output).unwrap();
        write_table(&mut output, "Focus", &rows);
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "Total time: {}",
        format_hours_minutes(summary.report.grand_total_minutes)
    )
    .unwrap();
    if summary.days > 1 {
        writeln!(output, "Days: {}", summary.days).unwrap();
        writeln!(
            output,
            "Average per day: {}",
            format_hours_minutes(summary.average_minutes_per_day)
        )
        .unwrap();
    }

    output
}

/// Formats the summary as delimited records: `group,name,minutes,percent`.
pub fn format_summary_delimited(summary: &Summary, delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(["group", "name", "minutes", "percent"])?;
    for row in &summary.report.rows {
        writer.write_record([
            "project",
            row.project_code.as_str(),
            row.total_minutes.to_string().as_str(),
            format!("{:.1}", row.percent_of_grand_total).as_str(),
        ])?;
    }
    for row in summary.by_type.iter().flatten() {
        writer.write_record([
            "type",
            row.activity.as_str(),
            row.total_minutes.to_string().as_str(),
            format!("{:.1}", row.percent_of_grand_total).as_str(),
        ])?;
    }
    for row in summary.by_focus.iter().flatten() {
        writer.write_record([
            "focus",
            row.focus.as_str(),
            row.total_minutes.to_string().as_str(),
            "",
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("failed to flush summary records")?;
    String::from_utf8(bytes).context("summary records are not valid UTF-8")
}

/// Runs the summary command.
pub fn run(
    notes: &[NoteFile],
    config: &Config,
    filters: &FilterArgs,
    options: SummaryOptions,
) -> Result<()> {
    let summary_config = build_config(filters, config)?;
    let summary = compute(notes, &config.section_marker, &summary_config, options);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let output = match options.format {
        OutputFormat::Table => format_summary(&summary),
        OutputFormat::Csv => format_summary_delimited(&summary, b',')?,
        OutputFormat::Tsv => format_summary_delimited(&summary, b'\t')?,
    };
    print!("{output}");
    Ok(())
}
