//! Citypage icon code mapping
//!
//! Environment Canada reports conditions as a two-digit icon code (`"00"` to
//! `"48"`). Each code maps to one canonical weather-type identifier; anything
//! outside the table maps to [`WeatherIcon::Unknown`].

use serde::{Deserialize, Serialize};

/// Canonical weather-type identifiers
///
/// Serialized in kebab-case, e.g. `DaySunnyOvercast` is `"day-sunny-overcast"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherIcon {
    DaySunny,
    DaySunnyOvercast,
    DayCloudy,
    DaySprinkle,
    DayShowers,
    DaySnow,
    DayThunderstorm,
    DayHaze,
    Cloud,
    Cloudy,
    Showers,
    Rain,
    Sleet,
    Snow,
    SnowWind,
    Thunderstorm,
    Fog,
    Na,
    NightClear,
    NightPartlyCloudy,
    NightAltCloudy,
    NightAltShowers,
    NightRainMix,
    NightAltSnow,
    NightThunderstorm,
    Tornado,
    Windy,
    Smoke,
    Sandstorm,
    Unknown,
}

use WeatherIcon::*;

/// Icon for each citypage code, indexed by the numeric code
static ICON_TABLE: [WeatherIcon; 49] = [
    // 00-09: daytime conditions
    DaySunny,
    DaySunny,
    DaySunnyOvercast,
    DayCloudy,
    DayCloudy,
    DayCloudy,
    DaySprinkle,
    DayShowers,
    DaySnow,
    DayThunderstorm,
    // 10-19
    Cloud,
    Showers,
    Rain,
    Rain,
    Sleet,
    Sleet,
    Snow,
    Snow,
    Snow,
    Thunderstorm,
    // 20-29
    Cloudy,
    Cloudy,
    DayCloudy,
    DayHaze,
    Fog,
    SnowWind,
    Sleet,
    Sleet,
    Rain,
    Na,
    // 30-39: nighttime conditions
    NightClear,
    NightClear,
    NightPartlyCloudy,
    NightAltCloudy,
    NightAltCloudy,
    NightPartlyCloudy,
    NightAltShowers,
    NightRainMix,
    NightAltSnow,
    NightThunderstorm,
    // 40-48
    SnowWind,
    Tornado,
    Tornado,
    Windy,
    Smoke,
    Sandstorm,
    Thunderstorm,
    Thunderstorm,
    Tornado,
];

impl WeatherIcon {
    /// Returns the canonical identifier string
    pub fn as_str(&self) -> &'static str {
        match self {
            DaySunny => "day-sunny",
            DaySunnyOvercast => "day-sunny-overcast",
            DayCloudy => "day-cloudy",
            DaySprinkle => "day-sprinkle",
            DayShowers => "day-showers",
            DaySnow => "day-snow",
            DayThunderstorm => "day-thunderstorm",
            DayHaze => "day-haze",
            Cloud => "cloud",
            Cloudy => "cloudy",
            Showers => "showers",
            Rain => "rain",
            Sleet => "sleet",
            Snow => "snow",
            SnowWind => "snow-wind",
            Thunderstorm => "thunderstorm",
            Fog => "fog",
            Na => "na",
            NightClear => "night-clear",
            NightPartlyCloudy => "night-partly-cloudy",
            NightAltCloudy => "night-alt-cloudy",
            NightAltShowers => "night-alt-showers",
            NightRainMix => "night-rain-mix",
            NightAltSnow => "night-alt-snow",
            NightThunderstorm => "night-thunderstorm",
            Tornado => "tornado",
            Windy => "windy",
            Smoke => "smoke",
            Sandstorm => "sandstorm",
            Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a numeric icon code to its weather type
pub fn icon_for_code(code: i64) -> WeatherIcon {
    usize::try_from(code)
        .ok()
        .and_then(|index| ICON_TABLE.get(index))
        .copied()
        .unwrap_or(Unknown)
}

/// Maps an icon code as it appears in the feed (`"02"`, `"2"`, `" 31 "`)
///
/// Empty or non-numeric codes map to [`WeatherIcon::Unknown`].
pub fn icon_for_feed_code(code: &str) -> WeatherIcon {
    code.trim()
        .parse::<i64>()
        .map(icon_for_code)
        .unwrap_or(Unknown)
}
