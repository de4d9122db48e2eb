//! Current conditions extraction

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::data::citypage::SiteData;
use crate::data::icons::icon_for_feed_code;
use crate::data::units::{convert_temperature, convert_wind_speed};
use crate::data::{WeatherIcon, WeatherRecord};

use super::temperature_cache::TemperatureCache;
use super::{EngineConfig, NormalizeError};

/// Rise/set list position of today's local sunrise
const SUNRISE_INDEX: usize = 1;

/// Rise/set list position of today's local sunset
const SUNSET_INDEX: usize = 3;

/// Builds the "now" record
///
/// A missing current temperature is replaced by the last cached one; with no
/// cache yet the pass fails with [`NormalizeError::NoDataAvailable`]. The
/// record is stamped with the observation time, or `now` if the feed has none.
///
/// Feels-like starts at the current temperature, then wind chill and humidex
/// override it in that order. The feed should never carry both.
pub fn extract_current(
    doc: &SiteData,
    config: &EngineConfig,
    cache: &mut TemperatureCache,
    now: NaiveDateTime,
) -> Result<WeatherRecord, NormalizeError> {
    let conditions = doc.current_conditions();

    let celsius = match conditions.and_then(|c| c.temperature()) {
        Some(observed) => {
            cache.remember_current(observed);
            observed
        }
        None => {
            let cached = cache
                .current_temperature()
                .ok_or(NormalizeError::NoDataAvailable)?;
            debug!(cached, "current temperature missing; using cached value");
            cached
        }
    };

    let timestamp = conditions.and_then(|c| c.observed_at()).unwrap_or(now);
    let mut record = WeatherRecord::new(timestamp);
    let temperature_units = config.temperature_units;
    record.temperature = Some(convert_temperature(celsius, temperature_units));

    if let Some(conditions) = conditions {
        record.wind_speed = conditions
            .wind_speed()
            .map(|kmh| convert_wind_speed(kmh, config.wind_units));
        record.wind_direction = conditions.wind_bearing();
        record.humidity = conditions.humidity();
        record.weather_type = conditions
            .icon_code()
            .map(icon_for_feed_code)
            .unwrap_or(WeatherIcon::Unknown);
    }

    if config.show_feels_like {
        let mut feels_like = celsius;
        if let Some(wind_chill) = conditions.and_then(|c| c.wind_chill()) {
            feels_like = wind_chill;
        }
        if let Some(humidex) = conditions.and_then(|c| c.humidex()) {
            feels_like = humidex;
        }
        record.feels_like_temperature = Some(convert_temperature(feels_like, temperature_units));
    }

    record.sunrise = doc.rise_set(SUNRISE_INDEX).and_then(|e| e.timestamp());
    record.sunset = doc.rise_set(SUNSET_INDEX).and_then(|e| e.timestamp());
    if record.sunrise.is_none() || record.sunset.is_none() {
        warn!("rise/set times missing from feed");
    }

    Ok(record)
}
