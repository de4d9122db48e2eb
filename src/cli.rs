//! Command-line interface parsing for ecweather
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into the engine options and feed source used at startup.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use thiserror::Error;

use crate::data::UnitSystem;
use crate::engine::EngineConfig;
use crate::provider::FeedSource;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// A unit option is neither "metric" nor "imperial"
    #[error("Invalid units for {option}: '{value}'. Valid units: metric, imperial")]
    InvalidUnits { option: &'static str, value: String },

    /// A watch interval of zero seconds
    #[error("Invalid watch interval: must be at least one second")]
    InvalidInterval,
}

/// ecweather - Environment Canada forecasts for one site
#[derive(Parser, Debug)]
#[command(name = "ecweather")]
#[command(about = "Current conditions, daily and hourly forecasts from Environment Canada")]
#[command(version)]
pub struct Cli {
    /// Citypage site code
    #[arg(long, default_value = "s0000458")]
    pub site_code: String,

    /// Two-letter province code
    #[arg(long, default_value = "ON")]
    pub prov_code: String,

    /// Unit system for precipitation amounts (metric or imperial)
    #[arg(long, default_value = "metric")]
    pub units: String,

    /// Temperature units; defaults to --units
    #[arg(long, value_name = "UNITS")]
    pub temp_units: Option<String>,

    /// Wind speed units; defaults to --units
    #[arg(long, value_name = "UNITS")]
    pub wind_units: Option<String>,

    /// Show the wind chill or humidex temperature
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub feels_like: bool,

    /// Show the precipitation column
    #[arg(long)]
    pub precip_amount: bool,

    /// Read a citypage XML file instead of fetching
    ///
    /// Examples:
    ///   ecweather --file s0000458_e.xml
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Keep polling every SECONDS
    #[arg(long, value_name = "SECONDS")]
    pub watch: Option<u64>,

    /// Keep the temperature cache on disk between runs
    #[arg(long)]
    pub persist_cache: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    pub engine: EngineConfig,
    pub source: FeedSource,
    pub json: bool,
    /// Poll interval when watching
    pub watch: Option<Duration>,
    pub persist_cache: bool,
}

/// Parses a unit option value
///
/// # Returns
/// * `Ok(UnitSystem)` for "metric" or "imperial", in any case
/// * `Err(CliError::InvalidUnits)` otherwise
pub fn parse_units_arg(option: &'static str, value: &str) -> Result<UnitSystem, CliError> {
    UnitSystem::from_str(value).ok_or_else(|| CliError::InvalidUnits {
        option,
        value: value.to_string(),
    })
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// Unset temperature and wind units follow `--units`.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let units = parse_units_arg("--units", &cli.units)?;
        let temperature_units = match &cli.temp_units {
            Some(value) => parse_units_arg("--temp-units", value)?,
            None => units,
        };
        let wind_units = match &cli.wind_units {
            Some(value) => parse_units_arg("--wind-units", value)?,
            None => units,
        };

        let watch = match cli.watch {
            Some(0) => return Err(CliError::InvalidInterval),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let source = match &cli.file {
            Some(path) => FeedSource::File(path.clone()),
            None => FeedSource::Remote {
                prov_code: cli.prov_code.clone(),
                site_code: cli.site_code.clone(),
            },
        };

        Ok(StartupConfig {
            engine: EngineConfig {
                units,
                temperature_units,
                wind_units,
                show_feels_like: cli.feels_like,
                show_precipitation_amount: cli.precip_amount,
            },
            source,
            json: cli.json,
            watch,
            persist_cache: cli.persist_cache,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units_arg() {
        assert_eq!(parse_units_arg("--units", "metric").unwrap(), UnitSystem::Metric);
        assert_eq!(parse_units_arg("--units", "imperial").unwrap(), UnitSystem::Imperial);
    }

    #[test]
    fn test_parse_units_arg_invalid() {
        let err = parse_units_arg("--temp-units", "kelvin").unwrap_err();
        assert!(err.to_string().contains("--temp-units"));
        assert!(err.to_string().contains("kelvin"));
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["ecweather"]);
        assert_eq!(cli.site_code, "s0000458");
        assert_eq!(cli.prov_code, "ON");
        assert!(cli.feels_like);
        assert!(!cli.precip_amount);
        assert!(cli.file.is_none());
    }

    #[test]
    fn test_startup_config_defaults() {
        let cli = Cli::parse_from(["ecweather"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(
            config.source,
            FeedSource::Remote {
                prov_code: "ON".to_string(),
                site_code: "s0000458".to_string(),
            }
        );
        assert!(!config.json);
        assert!(config.watch.is_none());
        assert!(!config.persist_cache);
    }

    #[test]
    fn test_units_cascade() {
        let cli = Cli::parse_from(["ecweather", "--units", "imperial", "--wind-units", "metric"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.engine.units, UnitSystem::Imperial);
        assert_eq!(config.engine.temperature_units, UnitSystem::Imperial);
        assert_eq!(config.engine.wind_units, UnitSystem::Metric);
    }

    #[test]
    fn test_feels_like_can_be_disabled() {
        let cli = Cli::parse_from(["ecweather", "--feels-like", "false", "--precip-amount"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert!(!config.engine.show_feels_like);
        assert!(config.engine.show_precipitation_amount);
    }

    #[test]
    fn test_file_source_and_watch() {
        let cli = Cli::parse_from(["ecweather", "--file", "feed.xml", "--watch", "60", "--json"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.source, FeedSource::File(PathBuf::from("feed.xml")));
        assert_eq!(config.watch, Some(Duration::from_secs(60)));
        assert!(config.json);
    }

    #[test]
    fn test_zero_watch_interval_rejected() {
        let cli = Cli::parse_from(["ecweather", "--watch", "0"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidInterval)
        ));
    }

    #[test]
    fn test_invalid_units_rejected() {
        let cli = Cli::parse_from(["ecweather", "--units", "nautical"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidUnits { option: "--units", .. })
        ));
    }
}
