//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Print the per-activity table after the month report.
    pub show_activities: bool,

    /// Treat any warning as a failure.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_activities: true,
            strict: false,
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

        // WF_SHOW_ACTIVITIES, WF_STRICT
        figment = figment.merge(Env::prefixed("WF_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for workflex.
///
/// On Linux: `~/.config/workflex`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("workflex"))
}
