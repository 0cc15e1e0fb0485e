//! Error types for the time-block engine.
//!
//! Parsing and validation never fail past their boundary: malformed lines and
//! interval findings are returned as data. Only a missing time section and a
//! failed rewrite are errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::time::TimeOfDay;

/// The document has no heading matching the section marker.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no '{marker}' section found")]
pub struct MissingSectionError {
    pub marker: String,
}

/// Why a single line could not be parsed into an interval.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineError {
    /// The line does not have the `HH:MM - HH:MM [CODE: ...]` shape.
    #[error("Invalid format")]
    InvalidFormat,

    /// A time token is shaped like `HH:MM` but out of range.
    #[error("Invalid time format '{token}'")]
    InvalidTime { token: String },

    /// The label code is not one of `T`, `M`, `C`, `A`, `L`, `B`.
    #[error("Invalid type code '{code}'")]
    InvalidTypeCode { code: String },

    /// The block ends before it starts. Overnight blocks are not supported.
    #[error("End time '{end}' should be after start time '{start}'")]
    EndBeforeStart { start: TimeOfDay, end: TimeOfDay },
}

/// Rewriting a document failed; the original file is left untouched.
#[derive(Debug, Error)]
pub enum FixPersistenceError {
    #[error("failed to create temporary file next to {path}")]
    CreateTemp {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write corrected content for {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to replace {path}")]
    Replace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FixPersistenceError {
    /// The document that was being rewritten.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::CreateTemp { path, .. } | Self::Write { path, .. } | Self::Replace { path, .. } => {
                path
            }
        }
    }
}
