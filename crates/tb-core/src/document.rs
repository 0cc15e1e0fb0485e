//! One daily note run through the whole pipeline.

use crate::error::MissingSectionError;
use crate::fix::{FixOutcome, fix, rewrite_document};
use crate::interval::Interval;
use crate::parse::{ParsedSection, parse_section};
use crate::section::{TIME_SECTION_MARKER, extract_section};
use crate::summary::{SummaryConfig, SummaryReport, TypeTotal, summarize, summarize_by_type};
use crate::validate::ValidationReport;

/// A document whose time section has been extracted and parsed.
#[derive(Debug, Clone)]
pub struct DailyNote<'a> {
    text: &'a str,
    section: ParsedSection,
}

impl<'a> DailyNote<'a> {
    /// Parses the section opened by the default `## Time` marker.
    pub fn parse(text: &'a str) -> Result<Self, MissingSectionError> {
        Self::parse_with_marker(text, TIME_SECTION_MARKER)
    }

    pub fn parse_with_marker(text: &'a str, marker: &str) -> Result<Self, MissingSectionError> {
        let lines = extract_section(text, marker)?;
        let section = parse_section(&lines);
        if !section.errors.is_empty() {
            tracing::debug!(errors = section.errors.len(), "section has malformed lines");
        }
        Ok(Self { text, section })
    }

    pub const fn text(&self) -> &'a str {
        self.text
    }

    pub const fn section(&self) -> &ParsedSection {
        &self.section
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.section.intervals
    }

    pub fn validate(&self) -> ValidationReport {
        ValidationReport::for_section(&self.section)
    }

    /// Human-readable findings in document line order.
    pub fn messages(&self) -> Vec<String> {
        self.validate().messages(&self.section)
    }

    pub fn fix(&self) -> FixOutcome {
        fix(&self.section.intervals)
    }

    /// The document with `outcome` applied, or `None` when nothing changed.
    pub fn fixed_text(&self, outcome: &FixOutcome) -> Option<String> {
        if outcome.fixed.is_empty() {
            return None;
        }
        Some(rewrite_document(self.text, &self.section, &outcome.intervals))
    }

    pub fn summarize(&self, config: &SummaryConfig) -> SummaryReport {
        summarize(&self.section.intervals, config)
    }

    pub fn summarize_by_type(&self, config: &SummaryConfig) -> Vec<TypeTotal> {
        summarize_by_type(&self.section.intervals, config)
    }
}
