//! Citypage normalization engine
//!
//! Turns one citypage document into canonical current, daily and hourly
//! records. The three passes are independent: a malformed forecast window
//! fails the daily pass only. The only state carried between polls is the
//! [`TemperatureCache`], which callers pass in by `&mut` and must not share
//! between concurrent passes.

pub mod current;
pub mod daily;
pub mod hourly;
pub mod precipitation;
pub mod temperature_cache;
pub mod window;

pub use current::extract_current;
pub use daily::{aggregate_days, FORECAST_DAYS};
pub use hourly::{extract_hourly, HOURLY_SLOTS};
pub use temperature_cache::TemperatureCache;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{SiteData, UnitSystem, WeatherRecord};

/// Errors that fail a single normalization pass
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// Segment 0 of the forecast is neither "Today" nor "Tonight"
    #[error("Malformed forecast window: {0}")]
    MalformedWindow(String),

    /// A field with no fallback is missing
    #[error("Missing expected field: {0}")]
    MissingField(String),

    /// No current temperature in this poll and none cached yet
    #[error("No current temperature available yet; try again next poll")]
    NoDataAvailable,
}

/// Units and display options applied during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Unit system for precipitation amounts
    pub units: UnitSystem,
    pub temperature_units: UnitSystem,
    pub wind_units: UnitSystem,
    /// Compute a feels-like temperature for current conditions
    pub show_feels_like: bool,
    /// Present precipitation as an amount column
    pub show_precipitation_amount: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            units: UnitSystem::Metric,
            temperature_units: UnitSystem::Metric,
            wind_units: UnitSystem::Metric,
            show_feels_like: true,
            show_precipitation_amount: false,
        }
    }
}

impl EngineConfig {
    /// Options in effect for the current-conditions record
    ///
    /// The feed has no probability of precipitation for "now", so the amount
    /// display is always off there.
    pub fn for_current_conditions(&self) -> Self {
        Self {
            show_precipitation_amount: false,
            ..*self
        }
    }
}

/// Output of one normalization cycle
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFeed {
    pub current: Result<WeatherRecord, NormalizeError>,
    pub daily: Result<Vec<WeatherRecord>, NormalizeError>,
    pub hourly: Vec<WeatherRecord>,
}

/// Runs the current, daily and hourly passes over one document
///
/// The current pass runs first so a fresh temperature reaches the cache
/// before the daily pass needs it as a fallback.
pub fn normalize(
    doc: &SiteData,
    config: &EngineConfig,
    cache: &mut TemperatureCache,
    now: NaiveDateTime,
) -> NormalizedFeed {
    let current = extract_current(doc, &config.for_current_conditions(), cache, now);
    let daily = aggregate_days(doc, config, cache);
    let hourly = extract_hourly(doc, config);

    NormalizedFeed {
        current,
        daily,
        hourly,
    }
}
