//! Unit conversions for temperature, wind speed and precipitation amounts
//!
//! Citypage values are always metric (°C, km/h, mm/cm). Conversions here are
//! linear and unrounded, except precipitation amounts which round to two
//! decimals the way the forecast is presented.

use serde::{Deserialize, Serialize};

use super::LengthUnit;

/// Kilometres per mile
const KM_PER_MILE: f64 = 1.609344;

/// Inches per centimetre as used for accumulation amounts
const INCHES_PER_CM: f64 = 0.394;

/// Inches per millimetre as used for accumulation amounts
const INCHES_PER_MM: f64 = 0.0394;

/// Unit system selected for a family of values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Parses a unit system name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "metric" => Some(UnitSystem::Metric),
            "imperial" => Some(UnitSystem::Imperial),
            _ => None,
        }
    }

    /// Suffix used when displaying a temperature
    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    /// Suffix used when displaying a wind speed
    pub fn wind_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km/h",
            UnitSystem::Imperial => "mph",
        }
    }
}

/// Converts a Celsius reading into the requested unit system
pub fn convert_temperature(celsius: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => celsius,
        UnitSystem::Imperial => 1.8 * celsius + 32.0,
    }
}

/// Inverse of [`convert_temperature`] for imperial values
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) / 1.8
}

/// Converts a km/h wind speed into the requested unit system
pub fn convert_wind_speed(kmh: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => kmh,
        UnitSystem::Imperial => kmh / KM_PER_MILE,
    }
}

/// Inverse of [`convert_wind_speed`] for imperial values
pub fn mph_to_kmh(mph: f64) -> f64 {
    mph * KM_PER_MILE
}

/// Converts an accumulation amount, rounding imperial results to 2 decimals
///
/// Metric amounts pass through untouched, as do amounts already in inches.
pub fn convert_precipitation_amount(
    amount: f64,
    unit: LengthUnit,
    units: UnitSystem,
) -> (f64, LengthUnit) {
    if units == UnitSystem::Metric {
        return (amount, unit);
    }

    match unit {
        LengthUnit::Centimetres => (round2(amount * INCHES_PER_CM), LengthUnit::Inches),
        LengthUnit::Millimetres => (round2(amount * INCHES_PER_MM), LengthUnit::Inches),
        LengthUnit::Inches => (amount, unit),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
