//! Core data models for ecweather
//!
//! This module contains the canonical record produced by the normalization
//! engine, plus the citypage document model, icon table and unit conversions
//! it is built from.

pub mod citypage;
pub mod client;
pub mod icons;
pub mod units;

pub use citypage::SiteData;
pub use client::{read_site_file, CitypageClient, FetchError};
pub use icons::WeatherIcon;
pub use units::UnitSystem;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Length units an accumulation amount can be reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    #[serde(rename = "mm")]
    Millimetres,
    #[serde(rename = "cm")]
    Centimetres,
    #[serde(rename = "in")]
    Inches,
}

impl LengthUnit {
    /// Parses the `units` attribute of an accumulation amount
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "mm" => Some(LengthUnit::Millimetres),
            "cm" => Some(LengthUnit::Centimetres),
            "in" => Some(LengthUnit::Inches),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LengthUnit::Millimetres => "mm",
            LengthUnit::Centimetres => "cm",
            LengthUnit::Inches => "in",
        }
    }
}

/// How a precipitation value should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    /// Probability of precipitation, 0-100
    Percentage,
    /// Accumulated amount
    Length(LengthUnit),
}

impl PrecipitationUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            PrecipitationUnit::Percentage => "%",
            PrecipitationUnit::Length(unit) => unit.as_str(),
        }
    }
}

/// A precipitation report: either a probability or an amount, never both
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Precipitation {
    pub value: f64,
    pub unit: PrecipitationUnit,
}

impl Precipitation {
    pub fn probability(percent: f64) -> Self {
        Self {
            value: percent,
            unit: PrecipitationUnit::Percentage,
        }
    }

    pub fn amount(value: f64, unit: LengthUnit) -> Self {
        Self {
            value,
            unit: PrecipitationUnit::Length(unit),
        }
    }

    pub fn is_probability(&self) -> bool {
        self.unit == PrecipitationUnit::Percentage
    }
}

/// Canonical weather record
///
/// The same shape carries current conditions, daily forecasts and hourly
/// forecasts; fields that do not apply to a given kind stay `None`. Daily
/// records use midnight of their date as the timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Local time the record describes
    pub timestamp: NaiveDateTime,
    /// Temperature reading (current and hourly)
    pub temperature: Option<f64>,
    /// Daily low
    pub min_temperature: Option<f64>,
    /// Daily high
    pub max_temperature: Option<f64>,
    /// Wind speed in the configured wind units
    pub wind_speed: Option<f64>,
    /// Wind bearing in degrees
    pub wind_direction: Option<f64>,
    /// Relative humidity percentage
    pub humidity: Option<f64>,
    /// Wind chill or humidex derived temperature
    pub feels_like_temperature: Option<f64>,
    /// Probability or amount of precipitation
    pub precipitation: Option<Precipitation>,
    /// Condition icon
    pub weather_type: WeatherIcon,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
}

impl WeatherRecord {
    /// Creates an empty record for the given time
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            temperature: None,
            min_temperature: None,
            max_temperature: None,
            wind_speed: None,
            wind_direction: None,
            humidity: None,
            feels_like_temperature: None,
            precipitation: None,
            weather_type: WeatherIcon::Unknown,
            sunrise: None,
            sunset: None,
        }
    }
}
