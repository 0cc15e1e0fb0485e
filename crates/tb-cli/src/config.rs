//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tb_core::TIME_SECTION_MARKER;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `YYYY-MM-DD.md` notes.
    pub notes_dir: PathBuf,
    /// Heading that opens the time section.
    pub section_marker: String,
    /// Count break blocks in summaries by default.
    pub include_breaks: bool,
    /// Skip blocks with empty descriptions in summaries by default.
    pub ignore_empty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notes_dir: PathBuf::from("."),
            section_marker: TIME_SECTION_MARKER.to_string(),
            include_breaks: false,
            ignore_empty: false,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // TB_NOTES_DIR, TB_SECTION_MARKER, ...
        figment = figment.merge(Env::prefixed("TB_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for tb.
///
/// On Linux: `~/.config/tb`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tb"))
}
