//! Precipitation reporting for a forecast segment
//!
//! A segment can carry an accumulation amount, a probability of
//! precipitation, or both. Only one is reported: a probability above zero
//! always wins over an amount.

use tracing::warn;

use crate::data::citypage::Forecast;
use crate::data::units::{convert_precipitation_amount, UnitSystem};
use crate::data::{LengthUnit, Precipitation};

/// Resolves the precipitation to report for one segment
pub fn resolve_precipitation(segment: &Forecast, units: UnitSystem) -> Option<Precipitation> {
    resolve(segment.accumulation(), segment.pop(), units)
}

/// Applies the amount-then-probability precedence to raw feed values
///
/// # Arguments
/// * `accumulation` - Amount and its raw `units` attribute, if present
/// * `pop` - Probability of precipitation in percent, if present
/// * `units` - Unit system for amounts
pub fn resolve(
    accumulation: Option<(f64, Option<&str>)>,
    pop: Option<f64>,
    units: UnitSystem,
) -> Option<Precipitation> {
    let amount = accumulation.and_then(|(value, unit)| {
        let Some(unit) = unit.and_then(LengthUnit::from_str) else {
            warn!(?unit, "ignoring accumulation with unrecognised units");
            return None;
        };
        let (value, unit) = convert_precipitation_amount(value, unit, units);
        Some(Precipitation::amount(value, unit))
    });

    match pop {
        Some(percent) if percent > 0.0 => Some(Precipitation::probability(percent)),
        _ => amount,
    }
}
