//! Command-line interface parsing for dashtop
//!
//! This module handles parsing of CLI arguments using clap, including the
//! data-source selection (live backend vs. static files), cache TTL, and
//! the startup tab.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::data::Category;
use crate::endpoint::DataMode;

/// Default backend base URL when none is given
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified tab name is not recognized
    #[error("Invalid tab: '{0}'. Valid tabs: overview, bar, line, pie, scatter3d, surface")]
    InvalidTab(String),
}

/// dashtop - terminal dashboard for service analytics
#[derive(Parser, Debug)]
#[command(name = "dashtop")]
#[command(about = "Terminal dashboard for service analytics")]
#[command(version)]
pub struct Cli {
    /// Base URL of the dashboard backend
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Read data from a directory of static JSON files instead of a backend
    ///
    /// Files follow the `<name>.json` convention (`summary.json`,
    /// `chart_bar.json`, ...). Selecting static mode disables the live
    /// update channel.
    #[arg(long, value_name = "DIR")]
    pub static_dir: Option<PathBuf>,

    /// Cache time-to-live for API responses, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 300)]
    pub ttl: u64,

    /// Disable the live update channel
    #[arg(long)]
    pub no_live: bool,

    /// Tab to open on startup
    ///
    /// Valid tabs: overview, bar, line, pie, scatter3d, surface
    #[arg(long, value_name = "TAB")]
    pub tab: Option<String>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Data-source strategy
    pub mode: DataMode,
    /// Cache TTL for API responses
    pub ttl: Duration,
    /// Whether to run the live update listener
    pub live_enabled: bool,
    /// Tab selected at startup
    pub initial_category: Category,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            mode: DataMode::Live {
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            ttl: Duration::from_secs(300),
            live_enabled: true,
            initial_category: Category::Overview,
        }
    }
}

/// Parses a tab string argument into a Category.
///
/// # Arguments
/// * `s` - The tab string from CLI
///
/// # Returns
/// * `Ok(Category)` if the string matches a valid tab
/// * `Err(CliError::InvalidTab)` if the string doesn't match
pub fn parse_tab_arg(s: &str) -> Result<Category, CliError> {
    Category::from_str(s).ok_or_else(|| CliError::InvalidTab(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if an invalid tab was specified
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mode = match &cli.static_dir {
            Some(dir) => DataMode::Static {
                data_dir: dir.clone(),
            },
            None => DataMode::Live {
                base_url: cli.base_url.clone(),
            },
        };

        // The live channel only exists against a live backend.
        let live_enabled = !cli.no_live && matches!(mode, DataMode::Live { .. });

        let initial_category = match &cli.tab {
            Some(tab) => parse_tab_arg(tab)?,
            None => Category::Overview,
        };

        Ok(Self {
            mode,
            ttl: Duration::from_secs(cli.ttl),
            live_enabled,
            initial_category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ChartKind;

    #[test]
    fn test_parse_tab_arg_valid_tabs() {
        assert_eq!(parse_tab_arg("overview").unwrap(), Category::Overview);
        assert_eq!(
            parse_tab_arg("bar").unwrap(),
            Category::Chart(ChartKind::Bar)
        );
        assert_eq!(
            parse_tab_arg("scatter3d").unwrap(),
            Category::Chart(ChartKind::Scatter3d)
        );
    }

    #[test]
    fn test_parse_tab_arg_invalid() {
        let result = parse_tab_arg("gauge");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Invalid tab"));
        assert!(err.to_string().contains("gauge"));
    }

    #[test]
    fn test_startup_config_default() {
        let config = StartupConfig::default();
        assert!(matches!(config.mode, DataMode::Live { .. }));
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert!(config.live_enabled);
        assert_eq!(config.initial_category, Category::Overview);
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["dashtop"]);
        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
        assert!(cli.static_dir.is_none());
        assert_eq!(cli.ttl, 300);
        assert!(!cli.no_live);
        assert!(cli.tab.is_none());
    }

    #[test]
    fn test_from_cli_defaults_to_live_mode() {
        let cli = Cli::parse_from(["dashtop"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(
            config.mode,
            DataMode::Live {
                base_url: DEFAULT_BASE_URL.to_string()
            }
        );
        assert!(config.live_enabled);
    }

    #[test]
    fn test_from_cli_static_dir_selects_static_mode() {
        let cli = Cli::parse_from(["dashtop", "--static-dir", "/srv/dash/data"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(
            config.mode,
            DataMode::Static {
                data_dir: PathBuf::from("/srv/dash/data")
            }
        );
        // Static mode has no live channel even without --no-live.
        assert!(!config.live_enabled);
    }

    #[test]
    fn test_from_cli_no_live_disables_live_channel() {
        let cli = Cli::parse_from(["dashtop", "--no-live"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert!(matches!(config.mode, DataMode::Live { .. }));
        assert!(!config.live_enabled);
    }

    #[test]
    fn test_from_cli_custom_ttl() {
        let cli = Cli::parse_from(["dashtop", "--ttl", "30"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.ttl, Duration::from_secs(30));
    }

    #[test]
    fn test_from_cli_tab_selection() {
        let cli = Cli::parse_from(["dashtop", "--tab", "pie"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.initial_category, Category::Chart(ChartKind::Pie));
    }

    #[test]
    fn test_from_cli_invalid_tab() {
        let cli = Cli::parse_from(["dashtop", "--tab", "gauge"]);
        let result = StartupConfig::from_cli(&cli);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_cli_custom_base_url() {
        let cli = Cli::parse_from(["dashtop", "--base-url", "https://dash.example"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(
            config.mode,
            DataMode::Live {
                base_url: "https://dash.example".to_string()
            }
        );
    }
}
