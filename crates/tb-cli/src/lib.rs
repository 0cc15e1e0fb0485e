//! Daily-notes time block CLI library.
//!
//! This crate provides the CLI interface for the time block engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, FilterArgs, OutputFormat, Selection};
pub use config::Config;
