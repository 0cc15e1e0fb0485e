//! Time-block interval engine for daily markdown notes.
//!
//! This crate contains the fundamental types and logic for:
//! - Extraction: locating the `## Time` section of a note
//! - Parsing: turning `HH:MM - HH:MM T: #Project description` lines into intervals
//! - Validation: reporting gaps, overlaps, and out-of-order blocks
//! - Fixing: closing gaps and rewriting the note atomically
//! - Summaries: totals per project, activity type, and focus category
//!
//! Everything except [`persist`] works on in-memory text.

mod document;
pub mod error;
pub mod fix;
mod interval;
pub mod parse;
pub mod persist;
pub mod section;
pub mod summary;
pub mod time;
pub mod validate;

pub use document::DailyNote;
pub use error::{FixPersistenceError, LineError, MissingSectionError};
pub use fix::{FixOutcome, fix, fix_gaps, rewrite_document};
pub use interval::{DEFAULT_PROJECT, Interval};
pub use parse::{ParseError, ParsedSection, parse_line, parse_section};
pub use persist::write_atomically;
pub use section::{SectionLine, TIME_SECTION_MARKER, extract_section};
pub use summary::{
    FocusTotal, SummaryConfig, SummaryReport, SummaryRow, TypeTotal, summarize, summarize_by_focus,
    summarize_by_type,
};
pub use time::{ActivityType, FocusCategory, TimeOfDay, UnknownActivityType, format_hours_minutes};
pub use validate::{ValidationIssue, ValidationReport, validate};
