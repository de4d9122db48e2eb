//! Hourly forecast extraction
//!
//! The hourly group is a rolling 24-slot array starting at the next full hour.
//! Each slot stands alone: no pairing or carry-over between slots.

use tracing::warn;

use crate::data::citypage::{apply_utc_offset, SiteData};
use crate::data::icons::icon_for_feed_code;
use crate::data::units::convert_temperature;
use crate::data::{Precipitation, WeatherIcon, WeatherRecord};

use super::EngineConfig;

/// Slots in the rolling hourly forecast
pub const HOURLY_SLOTS: usize = 24;

/// Extracts up to 24 hourly records in local time
///
/// A slot without a usable timestamp is skipped. A missing temperature
/// leaves the record's temperature empty.
pub fn extract_hourly(doc: &SiteData, config: &EngineConfig) -> Vec<WeatherRecord> {
    let offset = doc.hourly_utc_offset().unwrap_or_else(|| {
        warn!("hourly forecast has no UTC offset; using UTC");
        0.0
    });

    let slots = doc.hourly_forecasts();
    if slots.len() < HOURLY_SLOTS {
        warn!(slots = slots.len(), "hourly forecast is shorter than expected");
    }

    let mut hours = Vec::with_capacity(HOURLY_SLOTS);
    for (index, slot) in slots.iter().take(HOURLY_SLOTS).enumerate() {
        let Some(utc) = slot.utc_time() else {
            warn!(index, "skipping hourly slot without dateTimeUTC");
            continue;
        };

        let Some(local) = apply_utc_offset(utc, offset) else {
            warn!(index, offset, "skipping hourly slot outside the representable range");
            continue;
        };

        let mut record = WeatherRecord::new(local);
        record.temperature = slot
            .temperature()
            .map(|t| convert_temperature(t, config.temperature_units));
        record.precipitation = slot
            .lop()
            .filter(|lop| *lop > 0.0)
            .map(Precipitation::probability);
        record.weather_type = slot
            .icon_code()
            .map(icon_for_feed_code)
            .unwrap_or(WeatherIcon::Unknown);

        hours.push(record);
    }

    hours
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::units::UnitSystem;
    use chrono::{Duration, NaiveDate};

    fn hourly_doc(offset: &str, slots: usize) -> SiteData {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap();
        let mut body = String::new();
        for i in 0..slots {
            let time = (start + Duration::hours(i as i64)).format("%Y%m%d%H%M");
            let lop = if i % 3 == 0 { 40 } else { 0 };
            body.push_str(&format!(
                r#"<hourlyForecast dateTimeUTC="{time}">
                    <iconCode format="png">{icon:02}</iconCode>
                    <temperature unitType="metric" units="C">{temp}</temperature>
                    <lop category="Low" units="%">{lop}</lop>
                </hourlyForecast>"#,
                icon = i % 49,
                temp = i as f64 - 5.0,
            ));
        }
        let xml = format!(
            r#"<siteData><hourlyForecastGroup>
                <dateTime name="forecastIssue" zone="UTC" UTCOffset="0"><timeStamp>20240115153000</timeStamp></dateTime>
                <dateTime name="forecastIssue" zone="EST" UTCOffset="{offset}"><timeStamp>20240115103000</timeStamp></dateTime>
                {body}
            </hourlyForecastGroup></siteData>"#
        );
        SiteData::from_xml(&xml).expect("Failed to parse hourly document")
    }

    #[test]
    fn test_extracts_24_slots() {
        let hours = extract_hourly(&hourly_doc("-5", 24), &EngineConfig::default());
        assert_eq!(hours.len(), HOURLY_SLOTS);
        for (i, hour) in hours.iter().enumerate().skip(1) {
            let diff = hour.timestamp.signed_duration_since(hours[i - 1].timestamp);
            assert_eq!(diff.num_hours(), 1, "Hour {} should follow hour {}", i, i - 1);
        }
    }

    #[test]
    fn test_extra_slots_are_ignored() {
        let hours = extract_hourly(&hourly_doc("-5", 30), &EngineConfig::default());
        assert_eq!(hours.len(), HOURLY_SLOTS);
    }

    #[test]
    fn test_utc_offset_applied() {
        let hours = extract_hourly(&hourly_doc("-5", 24), &EngineConfig::default());
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap();
        assert_eq!(hours[0].timestamp, expected);
    }

    #[test]
    fn test_fractional_offset() {
        let hours = extract_hourly(&hourly_doc("-3.5", 1), &EngineConfig::default());
        assert_eq!(hours[0].timestamp.format("%H:%M").to_string(), "12:30");
    }

    #[test]
    fn test_probability_only_when_positive() {
        let hours = extract_hourly(&hourly_doc("-5", 24), &EngineConfig::default());
        let first = hours[0].precipitation.expect("slot 0 has a 40% lop");
        assert!(first.is_probability());
        assert!((first.value - 40.0).abs() < 1e-9);
        assert!(hours[1].precipitation.is_none());
        assert!(hours[2].precipitation.is_none());
    }

    #[test]
    fn test_temperature_converted_and_icon_mapped() {
        let config = EngineConfig {
            temperature_units: UnitSystem::Imperial,
            ..EngineConfig::default()
        };
        let hours = extract_hourly(&hourly_doc("-5", 24), &config);
        assert!((hours[5].temperature.unwrap() - 32.0).abs() < 1e-9);
        assert_eq!(hours[2].weather_type, WeatherIcon::DaySunnyOvercast);
    }

    #[test]
    fn test_missing_temperature_is_none() {
        let xml = r#"<siteData><hourlyForecastGroup>
            <dateTime UTCOffset="-8"><timeStamp>20240115153000</timeStamp></dateTime>
            <hourlyForecast dateTimeUTC="202401151600">
                <iconCode>99</iconCode>
                <temperature units="C"/>
                <lop units="%"/>
            </hourlyForecast>
        </hourlyForecastGroup></siteData>"#;
        let doc = SiteData::from_xml(xml).expect("Failed to parse");
        let hours = extract_hourly(&doc, &EngineConfig::default());

        assert_eq!(hours.len(), 1);
        assert!(hours[0].temperature.is_none());
        assert!(hours[0].precipitation.is_none());
        assert_eq!(hours[0].weather_type, WeatherIcon::Unknown);
        assert_eq!(hours[0].timestamp.format("%H").to_string(), "08");
    }

    #[test]
    fn test_unusable_local_offset_falls_back_to_utc_entry() {
        let hours = extract_hourly(&hourly_doc("inf", 24), &EngineConfig::default());
        assert_eq!(hours.len(), HOURLY_SLOTS);
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap();
        assert_eq!(hours[0].timestamp, expected);
    }

    #[test]
    fn test_unusable_offset_everywhere_uses_utc() {
        let xml = r#"<siteData><hourlyForecastGroup>
            <dateTime UTCOffset="1e20"><timeStamp>20240115153000</timeStamp></dateTime>
            <hourlyForecast dateTimeUTC="202401151600"><temperature units="C">1</temperature></hourlyForecast>
        </hourlyForecastGroup></siteData>"#;
        let doc = SiteData::from_xml(xml).expect("Failed to parse");
        let hours = extract_hourly(&doc, &EngineConfig::default());

        assert_eq!(hours.len(), 1);
        assert_eq!(hours[0].timestamp.format("%H:%M").to_string(), "16:00");
    }

    #[test]
    fn test_no_hourly_group_is_empty() {
        let doc = SiteData::from_xml("<siteData/>").expect("Failed to parse");
        assert!(extract_hourly(&doc, &EngineConfig::default()).is_empty());
    }
}
