//! Plain text and JSON rendering of a normalized feed

use std::fmt::Write;

use serde::Serialize;

use crate::data::{Precipitation, UnitSystem, WeatherRecord};
use crate::engine::{EngineConfig, NormalizedFeed};

/// Serializable view of one normalization cycle
///
/// A failed pass shows up as `null` data plus an error message.
#[derive(Debug, Serialize)]
pub struct FeedReport<'a> {
    pub current: Option<&'a WeatherRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_error: Option<String>,
    pub daily: Option<&'a [WeatherRecord]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_error: Option<String>,
    pub hourly: &'a [WeatherRecord],
    pub temperature_units: UnitSystem,
    pub wind_units: UnitSystem,
}

impl<'a> FeedReport<'a> {
    pub fn new(feed: &'a NormalizedFeed, config: &EngineConfig) -> Self {
        Self {
            current: feed.current.as_ref().ok(),
            current_error: feed.current.as_ref().err().map(|e| e.to_string()),
            daily: feed.daily.as_ref().ok().map(Vec::as_slice),
            daily_error: feed.daily.as_ref().err().map(|e| e.to_string()),
            hourly: &feed.hourly,
            temperature_units: config.temperature_units,
            wind_units: config.wind_units,
        }
    }
}

/// Renders the feed as pretty-printed JSON
pub fn render_json(feed: &NormalizedFeed, config: &EngineConfig) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&FeedReport::new(feed, config))
}

/// Renders the feed as aligned plain text
///
/// Temperatures and wind speeds are rounded to whole numbers. The
/// precipitation column is only shown when the amount display is enabled.
pub fn render_text(feed: &NormalizedFeed, config: &EngineConfig) -> String {
    let mut out = String::new();

    out.push_str("Current conditions\n");
    match &feed.current {
        Ok(record) => write_current(&mut out, record, config),
        Err(e) => {
            let _ = writeln!(out, "  unavailable: {}", e);
        }
    }

    out.push_str("\nDaily forecast\n");
    match &feed.daily {
        Ok(days) if days.is_empty() => out.push_str("  none\n"),
        Ok(days) => {
            for day in days {
                write_day(&mut out, day, config);
            }
        }
        Err(e) => {
            let _ = writeln!(out, "  unavailable: {}", e);
        }
    }

    out.push_str("\nHourly forecast\n");
    if feed.hourly.is_empty() {
        out.push_str("  none\n");
    }
    for hour in &feed.hourly {
        write_hour(&mut out, hour, config);
    }

    out
}

fn write_current(out: &mut String, record: &WeatherRecord, config: &EngineConfig) {
    let temp_suffix = config.temperature_units.temperature_suffix();

    let _ = writeln!(out, "  Observed     {}", record.timestamp.format("%Y-%m-%d %H:%M"));
    if let Some(temperature) = record.temperature {
        let _ = write!(out, "  Temperature  {}{}", whole(temperature), temp_suffix);
        if let Some(feels_like) = record.feels_like_temperature {
            let _ = write!(out, " (feels like {}{})", whole(feels_like), temp_suffix);
        }
        out.push('\n');
    }
    if let Some(speed) = record.wind_speed {
        let _ = write!(out, "  Wind         {} {}", whole(speed), config.wind_units.wind_suffix());
        if let Some(bearing) = record.wind_direction {
            let _ = write!(out, " from {}°", whole(bearing));
        }
        out.push('\n');
    }
    if let Some(humidity) = record.humidity {
        let _ = writeln!(out, "  Humidity     {}%", whole(humidity));
    }
    let _ = writeln!(out, "  Conditions   {}", record.weather_type);
    if let (Some(sunrise), Some(sunset)) = (record.sunrise, record.sunset) {
        let _ = writeln!(
            out,
            "  Sun          up {} down {}",
            sunrise.format("%H:%M"),
            sunset.format("%H:%M")
        );
    }
}

fn write_day(out: &mut String, record: &WeatherRecord, config: &EngineConfig) {
    let suffix = config.temperature_units.temperature_suffix();
    let _ = write!(
        out,
        "  {:<10}  {:<22}  {:>6} / {:<6}",
        record.timestamp.format("%a %d %b").to_string(),
        record.weather_type.as_str(),
        format_temperature(record.min_temperature, suffix),
        format_temperature(record.max_temperature, suffix),
    );
    if config.show_precipitation_amount {
        let _ = write!(out, "  {}", format_precipitation(record.precipitation.as_ref()));
    }
    out.push('\n');
}

fn write_hour(out: &mut String, record: &WeatherRecord, config: &EngineConfig) {
    let suffix = config.temperature_units.temperature_suffix();
    let _ = write!(
        out,
        "  {}  {:<22}  {:>6}",
        record.timestamp.format("%a %H:%M"),
        record.weather_type.as_str(),
        format_temperature(record.temperature, suffix),
    );
    if config.show_precipitation_amount {
        let _ = write!(out, "  {}", format_precipitation(record.precipitation.as_ref()));
    }
    out.push('\n');
}

/// Rounds for display without printing "-0"
fn whole(value: f64) -> f64 {
    let rounded = value.round();
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn format_temperature(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(t) => format!("{}{}", whole(t), suffix),
        None => "--".to_string(),
    }
}

fn format_precipitation(precipitation: Option<&Precipitation>) -> String {
    match precipitation {
        Some(p) if p.is_probability() => format!("{}{}", whole(p.value), p.unit.suffix()),
        Some(p) => format!("{} {}", p.value, p.unit.suffix()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LengthUnit, WeatherIcon};
    use crate::engine::NormalizeError;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample_feed() -> NormalizedFeed {
        let mut current = WeatherRecord::new(at(15, 9));
        current.temperature = Some(6.4);
        current.feels_like_temperature = Some(-0.3);
        current.wind_speed = Some(19.6);
        current.wind_direction = Some(270.0);
        current.humidity = Some(81.0);
        current.weather_type = WeatherIcon::DayCloudy;

        let mut today = WeatherRecord::new(at(15, 0));
        today.min_temperature = Some(5.0);
        today.max_temperature = Some(15.0);
        today.weather_type = WeatherIcon::DaySunny;
        today.precipitation = Some(Precipitation::probability(40.0));

        let mut tomorrow = WeatherRecord::new(at(16, 0));
        tomorrow.min_temperature = Some(2.0);
        tomorrow.max_temperature = Some(9.0);
        tomorrow.precipitation = Some(Precipitation::amount(0.39, LengthUnit::Inches));

        let mut hour = WeatherRecord::new(at(15, 10));
        hour.temperature = Some(7.0);

        NormalizedFeed {
            current: Ok(current),
            daily: Ok(vec![today, tomorrow]),
            hourly: vec![hour],
        }
    }

    #[test]
    fn test_text_rounds_and_suffixes() {
        let text = render_text(&sample_feed(), &EngineConfig::default());
        assert!(text.contains("Temperature  6°C (feels like 0°C)"));
        assert!(text.contains("Wind         20 km/h from 270°"));
        assert!(text.contains("Humidity     81%"));
        assert!(text.contains("day-cloudy"));
        assert!(text.contains("5°C / 15°C"));
        assert!(text.contains("Mon 10:00"));
    }

    #[test]
    fn test_precipitation_column_follows_config() {
        let hidden = render_text(&sample_feed(), &EngineConfig::default());
        assert!(!hidden.contains("40%"));

        let config = EngineConfig {
            show_precipitation_amount: true,
            ..EngineConfig::default()
        };
        let shown = render_text(&sample_feed(), &config);
        assert!(shown.contains("40%"));
        assert!(shown.contains("0.39 in"));
    }

    #[test]
    fn test_failed_passes_are_reported() {
        let feed = NormalizedFeed {
            current: Err(NormalizeError::NoDataAvailable),
            daily: Err(NormalizeError::MalformedWindow("Monday".to_string())),
            hourly: Vec::new(),
        };
        let text = render_text(&feed, &EngineConfig::default());
        assert!(text.contains("unavailable: No current temperature"));
        assert!(text.contains("unavailable: Malformed forecast window: Monday"));
        assert!(text.contains("Hourly forecast\n  none"));
    }

    #[test]
    fn test_json_report() {
        let json = render_json(&sample_feed(), &EngineConfig::default()).expect("Failed to render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");

        assert_eq!(value["daily"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["daily"][0]["max_temperature"], 15.0);
        assert_eq!(value["temperature_units"], "metric");
        assert!(value.get("current_error").is_none());
    }

    #[test]
    fn test_json_report_with_failed_pass() {
        let mut feed = sample_feed();
        feed.daily = Err(NormalizeError::MissingField("timeStamp".to_string()));

        let json = render_json(&feed, &EngineConfig::default()).expect("Failed to render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");
        assert!(value["daily"].is_null());
        assert!(value["daily_error"]
            .as_str()
            .is_some_and(|e| e.contains("timeStamp")));
    }
}
