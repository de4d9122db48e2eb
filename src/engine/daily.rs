//! Daily forecast aggregation
//!
//! Walks the classified forecast window one day/night pair at a time and
//! produces one record per calendar day, starting with today.

use chrono::{Days, NaiveDate};
use tracing::{debug, warn};

use crate::data::citypage::{Forecast, SiteData, TemperatureClass};
use crate::data::icons::icon_for_feed_code;
use crate::data::units::convert_temperature;
use crate::data::{WeatherIcon, WeatherRecord};

use super::precipitation::resolve_precipitation;
use super::temperature_cache::TemperatureCache;
use super::window::{classify_window, ForecastWindow};
use super::{EngineConfig, NormalizeError};

/// Number of days a complete window yields
pub const FORECAST_DAYS: usize = 6;

/// Builds the daily forecast, today first
///
/// Today's extremes come from the Today/Tonight pair when the window still
/// has both halves; that pair is also written to `cache`. Once Today has
/// rolled off, the cached pair is used, or the current temperature if no pair
/// has been cached since start.
pub fn aggregate_days(
    doc: &SiteData,
    config: &EngineConfig,
    cache: &mut TemperatureCache,
) -> Result<Vec<WeatherRecord>, NormalizeError> {
    let segments = doc.forecasts();
    let window = classify_window(segments)?;

    let issued = doc.forecast_issue_local().ok_or_else(|| {
        NormalizeError::MissingField("forecastGroup/dateTime/timeStamp".to_string())
    })?;

    let current_temperature = doc
        .current_conditions()
        .and_then(|c| c.temperature())
        .or_else(|| cache.current_temperature());

    let mut date = issued.date();
    let mut days = Vec::with_capacity(FORECAST_DAYS);
    days.push(current_day(date, segments, &window, current_temperature, config, cache));

    for step in (window.next_day_offset..window.last_index).step_by(2) {
        let (Some(day), Some(night)) = (segments.get(step), segments.get(step + 1)) else {
            warn!(
                segments = segments.len(),
                produced = days.len(),
                "forecast window ends early"
            );
            break;
        };

        date = next_date(date)?;
        let mut record = day_record(date, day, config);
        let (min, max) = pair_extremes(day, Some(night));
        record.min_temperature = min.map(|t| convert_temperature(t, config.temperature_units));
        record.max_temperature = max.map(|t| convert_temperature(t, config.temperature_units));
        days.push(record);
    }

    Ok(days)
}

fn current_day(
    date: NaiveDate,
    segments: &[Forecast],
    window: &ForecastWindow,
    current_temperature: Option<f64>,
    config: &EngineConfig,
    cache: &mut TemperatureCache,
) -> WeatherRecord {
    // Classification guarantees segment 0 exists.
    let first = &segments[0];
    let mut record = day_record(date, first, config);

    let (min, max) = if window.full_day() {
        let second = segments.get(1);
        let extremes = pair_extremes(first, second);
        if second.is_some() {
            cache.remember_today(extremes.0, extremes.1);
        }
        extremes
    } else {
        let (cached_min, cached_max) = match cache.today_extremes() {
            Some(cached) => {
                debug!(?cached, "today's daytime has rolled off; using cached extremes");
                cached
            }
            None => {
                warn!(
                    ?current_temperature,
                    "no cached extremes for today; falling back to current temperature"
                );
                (None, None)
            }
        };
        // Tonight's own value only fills a side nothing else could.
        let (own_min, own_max) = pair_extremes(first, None);
        (
            cached_min.or(current_temperature).or(own_min),
            cached_max.or(current_temperature).or(own_max),
        )
    };

    record.min_temperature = min.map(|t| convert_temperature(t, config.temperature_units));
    record.max_temperature = max.map(|t| convert_temperature(t, config.temperature_units));
    record
}

/// A record dated `date` with icon and precipitation from `segment`
fn day_record(date: NaiveDate, segment: &Forecast, config: &EngineConfig) -> WeatherRecord {
    let mut record = WeatherRecord::new(date.and_time(chrono::NaiveTime::MIN));
    record.weather_type = segment
        .icon_code()
        .map(icon_for_feed_code)
        .unwrap_or(WeatherIcon::Unknown);
    record.precipitation = resolve_precipitation(segment, config.units);
    record
}

/// Min and max (°C) of a pair, by each segment's low/high tag
///
/// Later segments win if both carry the same tag.
pub fn pair_extremes(first: &Forecast, second: Option<&Forecast>) -> (Option<f64>, Option<f64>) {
    let mut min = None;
    let mut max = None;
    for (value, class) in std::iter::once(first)
        .chain(second)
        .filter_map(Forecast::temperature)
    {
        match class {
            TemperatureClass::Low => min = Some(value),
            TemperatureClass::High => max = Some(value),
        }
    }
    (min, max)
}

fn next_date(date: NaiveDate) -> Result<NaiveDate, NormalizeError> {
    date.checked_add_days(Days::new(1))
        .ok_or_else(|| NormalizeError::MissingField(format!("no date after {}", date)))
}
