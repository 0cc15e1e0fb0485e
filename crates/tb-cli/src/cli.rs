//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Time blocks in daily markdown notes.
///
/// Reads the `## Time` section of `YYYY-MM-DD.md` notes, reports gaps and
/// overlaps between blocks, closes gaps, and totals time per project.
#[derive(Debug, Parser)]
#[command(name = "tb", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Total time per project over one or more notes.
    Summary {
        #[command(flatten)]
        selection: Selection,

        #[command(flatten)]
        filters: FilterArgs,

        /// Also total time per activity type.
        #[arg(long)]
        by_type: bool,

        /// Also total time per focus category (deep, meeting, shallow).
        #[arg(long)]
        by_focus: bool,

        /// Output as JSON.
        #[arg(long, conflicts_with = "format")]
        json: bool,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Report malformed lines, gaps, overlaps, and out-of-order blocks.
    Validate {
        #[command(flatten)]
        selection: Selection,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Close gaps by extending blocks and rewrite the notes in place.
    Fix {
        #[command(flatten)]
        selection: Selection,

        /// Print the corrected time section instead of writing it.
        #[arg(long)]
        dry_run: bool,
    },

    /// List the parsed time blocks of the selected notes.
    Show {
        #[command(flatten)]
        selection: Selection,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Which notes a command reads.
///
/// With no flags, today's note is used.
#[derive(Debug, Clone, Default, Args)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each date flag is an independent CLI switch"
)]
pub struct Selection {
    /// A specific note, named `YYYY-MM-DD.md`.
    #[arg(conflicts_with_all = ["today", "yesterday", "date", "from", "this_week", "last_week", "this_month", "last_month", "this_year", "last_year"])]
    pub file: Option<PathBuf>,

    /// Directory holding the daily notes (overrides config).
    #[arg(long)]
    pub notes_dir: Option<PathBuf>,

    /// Today's note.
    #[arg(long)]
    pub today: bool,

    /// Yesterday's note.
    #[arg(long, conflicts_with = "today")]
    pub yesterday: bool,

    /// A single day (YYYY-MM-DD, today, yesterday, or e.g. "3 days ago").
    #[arg(long, conflicts_with_all = ["today", "yesterday", "from"])]
    pub date: Option<String>,

    /// First day of a range (same formats as --date).
    #[arg(long, conflicts_with_all = ["today", "yesterday"])]
    pub from: Option<String>,

    /// Last day of a range, inclusive. Defaults to today.
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Monday through Sunday of the current week.
    #[arg(long, conflicts_with_all = ["today", "yesterday", "date", "from", "last_week", "this_month", "last_month", "this_year", "last_year"])]
    pub this_week: bool,

    /// Monday through Sunday of the previous week.
    #[arg(long, conflicts_with_all = ["today", "yesterday", "date", "from", "this_month", "last_month", "this_year", "last_year"])]
    pub last_week: bool,

    /// The current calendar month.
    #[arg(long, conflicts_with_all = ["today", "yesterday", "date", "from", "last_month", "this_year", "last_year"])]
    pub this_month: bool,

    /// The previous calendar month.
    #[arg(long, conflicts_with_all = ["today", "yesterday", "date", "from", "this_year", "last_year"])]
    pub last_month: bool,

    /// January through December of the current year.
    #[arg(long, conflicts_with_all = ["today", "yesterday", "date", "from", "last_year"])]
    pub this_year: bool,

    /// January through December of the previous year.
    #[arg(long, conflicts_with_all = ["today", "yesterday", "date", "from"])]
    pub last_year: bool,
}

/// Which blocks count toward a summary.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Only count blocks whose description matches this regular expression.
    #[arg(long)]
    pub filter: Option<String>,

    /// Skip blocks whose description matches this regular expression.
    #[arg(long)]
    pub ignore: Option<String>,

    /// Match --filter and --ignore case-insensitively.
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Skip blocks with an empty description.
    #[arg(long)]
    pub ignore_empty: bool,

    /// Count break blocks.
    #[arg(long)]
    pub include_breaks: bool,
}

/// Summary rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Tsv,
}
