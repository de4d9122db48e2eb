//! Cross-poll temperature memory
//!
//! The citypage feed occasionally drops the current temperature, and once the
//! "Today" segment rolls off in the afternoon the forecast no longer carries
//! today's high. `TemperatureCache` keeps the last good values so the engine
//! can fill those gaps. Values are stored in °C, as read from the feed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureCache {
    cached_current_temperature: Option<f64>,
    cached_today_min: Option<f64>,
    cached_today_max: Option<f64>,
    has_cached_today: bool,
}

impl TemperatureCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Last observed current temperature
    pub fn current_temperature(&self) -> Option<f64> {
        self.cached_current_temperature
    }

    /// Records the latest observed current temperature
    pub fn remember_current(&mut self, celsius: f64) {
        self.cached_current_temperature = Some(celsius);
    }

    /// Whether a full day/night pair for today has been seen
    pub fn has_cached_today(&self) -> bool {
        self.has_cached_today
    }

    /// Cached (min, max) for today, if a full pair has been seen
    pub fn today_extremes(&self) -> Option<(Option<f64>, Option<f64>)> {
        self.has_cached_today
            .then_some((self.cached_today_min, self.cached_today_max))
    }

    /// Records the extremes of a full day/night pair for today
    ///
    /// A side missing from this poll keeps its previously cached value. A
    /// pair with neither side leaves the cache untouched.
    pub fn remember_today(&mut self, min: Option<f64>, max: Option<f64>) {
        if min.is_none() && max.is_none() {
            return;
        }
        if min.is_some() {
            self.cached_today_min = min;
        }
        if max.is_some() {
            self.cached_today_max = max;
        }
        self.has_cached_today = true;
    }
}
