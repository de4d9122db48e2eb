//! Environment Canada citypage document model
//!
//! The citypage XML is deserialized with `quick-xml` into structs where every
//! element is optional or defaulted, since a poll can drop any field. The
//! accessor methods on these types are the only way the engine reads the
//! document: each returns `Option<T>` and treats empty text as absent.

use chrono::{NaiveDateTime, TimeDelta};
use quick_xml::de::from_str;
use serde::Deserialize;

/// Timestamp layout of `<timeStamp>` elements
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Timestamp layout of the hourly `dateTimeUTC` attribute
const TIMESTAMP_FORMAT_MINUTES: &str = "%Y%m%d%H%M";

/// Largest plausible UTC offset, in hours
const MAX_UTC_OFFSET_HOURS: f64 = 24.0;

/// Root `<siteData>` element
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SiteData {
    location: Option<Location>,
    #[serde(rename = "currentConditions")]
    current_conditions: Option<CurrentConditions>,
    #[serde(rename = "forecastGroup")]
    forecast_group: Option<ForecastGroup>,
    #[serde(rename = "hourlyForecastGroup")]
    hourly_forecast_group: Option<HourlyForecastGroup>,
    #[serde(rename = "riseSet")]
    rise_set: Option<RiseSet>,
}

/// An element carrying text and optional `units`/`class` attributes
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Value {
    #[serde(rename = "@units")]
    units: Option<String>,
    #[serde(rename = "@class")]
    class: Option<String>,
    #[serde(rename = "$text")]
    text: Option<String>,
}

impl Value {
    fn text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn number(&self) -> Option<f64> {
        self.text()?.parse().ok()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Location {
    name: Option<Value>,
}

/// `<currentConditions>` block
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CurrentConditions {
    #[serde(rename = "dateTime")]
    date_times: Vec<DateTimeEntry>,
    temperature: Option<Value>,
    #[serde(rename = "relativeHumidity")]
    relative_humidity: Option<Value>,
    wind: Option<Wind>,
    #[serde(rename = "iconCode")]
    icon_code: Option<Value>,
    #[serde(rename = "windChill")]
    wind_chill: Option<Value>,
    humidex: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Wind {
    speed: Option<Value>,
    bearing: Option<Value>,
}

/// A `<dateTime>` entry of the forecast, hourly or rise/set groups
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DateTimeEntry {
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "@UTCOffset")]
    utc_offset: Option<String>,
    #[serde(rename = "timeStamp")]
    time_stamp: Option<Value>,
}

impl DateTimeEntry {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(self.time_stamp.as_ref()?.text()?)
    }

    /// UTC offset in hours; fractional for zones like NST
    ///
    /// Values that are not finite or exceed a day are treated as missing.
    pub fn utc_offset_hours(&self) -> Option<f64> {
        self.utc_offset
            .as_deref()?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|hours| hours.is_finite() && hours.abs() <= MAX_UTC_OFFSET_HOURS)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ForecastGroup {
    #[serde(rename = "dateTime")]
    date_times: Vec<DateTimeEntry>,
    #[serde(rename = "forecast")]
    forecasts: Vec<Forecast>,
}

/// Tag on a forecast temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureClass {
    Low,
    High,
}

/// One `<forecast>` segment: a daytime or nighttime half of a day
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Forecast {
    period: Option<Period>,
    #[serde(rename = "abbreviatedForecast")]
    abbreviated_forecast: Option<AbbreviatedForecast>,
    temperatures: Option<Temperatures>,
    precipitation: Option<PrecipitationBlock>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Period {
    #[serde(rename = "@textForecastName")]
    text_forecast_name: Option<String>,
    #[serde(rename = "$text")]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AbbreviatedForecast {
    #[serde(rename = "iconCode")]
    icon_code: Option<Value>,
    pop: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Temperatures {
    #[serde(rename = "temperature")]
    temperatures: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PrecipitationBlock {
    accumulation: Option<Accumulation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Accumulation {
    amount: Option<Value>,
}

impl Forecast {
    /// The `textForecastName` label, e.g. "Today", "Tonight", "Monday night"
    pub fn period_label(&self) -> Option<&str> {
        self.period
            .as_ref()?
            .text_forecast_name
            .as_deref()
            .map(str::trim)
    }

    /// Day name text of the period, e.g. "Monday"
    pub fn period_name(&self) -> Option<&str> {
        self.period.as_ref()?.text.as_deref().map(str::trim)
    }

    /// The segment's single temperature and whether it is a low or a high
    pub fn temperature(&self) -> Option<(f64, TemperatureClass)> {
        let value = self.temperatures.as_ref()?.temperatures.first()?;
        let class = match value.class.as_deref()?.trim() {
            "low" => TemperatureClass::Low,
            "high" => TemperatureClass::High,
            _ => return None,
        };
        Some((value.number()?, class))
    }

    pub fn icon_code(&self) -> Option<&str> {
        self.abbreviated_forecast.as_ref()?.icon_code.as_ref()?.text()
    }

    /// Probability of precipitation in percent
    pub fn pop(&self) -> Option<f64> {
        self.abbreviated_forecast.as_ref()?.pop.as_ref()?.number()
    }

    /// Accumulation amount and the raw `units` attribute
    pub fn accumulation(&self) -> Option<(f64, Option<&str>)> {
        let amount = self
            .precipitation
            .as_ref()?
            .accumulation
            .as_ref()?
            .amount
            .as_ref()?;
        Some((amount.number()?, amount.units.as_deref()))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HourlyForecastGroup {
    #[serde(rename = "dateTime")]
    date_times: Vec<DateTimeEntry>,
    #[serde(rename = "hourlyForecast")]
    hourly_forecasts: Vec<HourlyForecast>,
}

/// One `<hourlyForecast>` slot
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HourlyForecast {
    #[serde(rename = "@dateTimeUTC")]
    date_time_utc: Option<String>,
    #[serde(rename = "iconCode")]
    icon_code: Option<Value>,
    temperature: Option<Value>,
    lop: Option<Value>,
}

impl HourlyForecast {
    pub fn utc_time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(self.date_time_utc.as_deref()?)
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature.as_ref()?.number()
    }

    pub fn icon_code(&self) -> Option<&str> {
        self.icon_code.as_ref()?.text()
    }

    /// Likelihood of precipitation in percent
    pub fn lop(&self) -> Option<f64> {
        self.lop.as_ref()?.number()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RiseSet {
    #[serde(rename = "dateTime")]
    date_times: Vec<DateTimeEntry>,
}

impl CurrentConditions {
    /// Local observation time, falling back to the UTC entry
    pub fn observed_at(&self) -> Option<NaiveDateTime> {
        local_then_utc(&self.date_times, DateTimeEntry::timestamp)
    }

    /// Temperature in °C
    pub fn temperature(&self) -> Option<f64> {
        self.temperature.as_ref()?.number()
    }

    /// Wind speed in km/h; "calm" and similar text reads as absent
    pub fn wind_speed(&self) -> Option<f64> {
        self.wind.as_ref()?.speed.as_ref()?.number()
    }

    /// Wind bearing in degrees
    pub fn wind_bearing(&self) -> Option<f64> {
        self.wind.as_ref()?.bearing.as_ref()?.number()
    }

    pub fn humidity(&self) -> Option<f64> {
        self.relative_humidity.as_ref()?.number()
    }

    pub fn icon_code(&self) -> Option<&str> {
        self.icon_code.as_ref()?.text()
    }

    pub fn wind_chill(&self) -> Option<f64> {
        self.wind_chill.as_ref()?.number()
    }

    pub fn humidex(&self) -> Option<f64> {
        self.humidex.as_ref()?.number()
    }
}

impl SiteData {
    /// Parses a citypage XML document
    pub fn from_xml(xml: &str) -> Result<Self, quick_xml::DeError> {
        from_str(xml)
    }

    /// Name of the forecast location, e.g. "Toronto"
    pub fn location_name(&self) -> Option<&str> {
        self.location.as_ref()?.name.as_ref()?.text()
    }

    pub fn current_conditions(&self) -> Option<&CurrentConditions> {
        self.current_conditions.as_ref()
    }

    /// Forecast segments in feed order; empty if the group is missing
    pub fn forecasts(&self) -> &[Forecast] {
        self.forecast_group
            .as_ref()
            .map(|group| group.forecasts.as_slice())
            .unwrap_or_default()
    }

    /// Local issue time of the forecast group
    ///
    /// The group lists the issue time in UTC first and local time second;
    /// the local entry is preferred.
    pub fn forecast_issue_local(&self) -> Option<NaiveDateTime> {
        let entries = &self.forecast_group.as_ref()?.date_times;
        local_then_utc(entries, DateTimeEntry::timestamp)
    }

    /// Hourly slots in feed order; empty if the group is missing
    pub fn hourly_forecasts(&self) -> &[HourlyForecast] {
        self.hourly_forecast_group
            .as_ref()
            .map(|group| group.hourly_forecasts.as_slice())
            .unwrap_or_default()
    }

    /// Local UTC offset declared by the hourly group, in hours
    pub fn hourly_utc_offset(&self) -> Option<f64> {
        let entries = &self.hourly_forecast_group.as_ref()?.date_times;
        local_then_utc(entries, DateTimeEntry::utc_offset_hours)
    }

    /// Entry `index` of the rise/set list
    pub fn rise_set(&self, index: usize) -> Option<&DateTimeEntry> {
        self.rise_set.as_ref()?.date_times.get(index)
    }
}

fn local_then_utc<T>(
    entries: &[DateTimeEntry],
    read: impl Fn(&DateTimeEntry) -> Option<T>,
) -> Option<T> {
    entries
        .get(1)
        .and_then(&read)
        .or_else(|| entries.first().and_then(&read))
}

/// Parses a feed timestamp in `YYYYMMDDhhmmss` or `YYYYMMDDhhmm` form
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT_MINUTES))
        .ok()
}

/// Shifts a UTC time by a (possibly fractional) hour offset
///
/// Returns `None` if the offset is not finite or the result is out of range.
pub fn apply_utc_offset(utc: NaiveDateTime, offset_hours: f64) -> Option<NaiveDateTime> {
    if !offset_hours.is_finite() {
        return None;
    }
    let delta = TimeDelta::try_seconds((offset_hours * 3600.0).round() as i64)?;
    utc.checked_add_signed(delta)
}
