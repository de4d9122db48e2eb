//! Forecast window classification
//!
//! The citypage forecast holds up to 12 segments, two per day. In the
//! morning segment 0 is "Today" and segment 1 is "Tonight", followed by five
//! full days. Once the daytime half has passed, segment 0 becomes "Tonight"
//! and the next five days shift down by one, leaving a lone daytime segment
//! at index 11 that has no night to pair with.

use crate::data::citypage::Forecast;

use super::NormalizeError;

/// Period label of a segment covering the rest of today's daytime
const DAYTIME_CURRENT_LABEL: &str = "Today";

/// Period label of a segment covering tonight
const NIGHTTIME_CURRENT_LABEL: &str = "Tonight";

/// Which half of the current day segment 0 describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayHalf {
    Daytime,
    Nighttime,
}

/// Layout of the rolling forecast for this poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastWindow {
    /// Half of today held by segment 0
    pub current_half: DayHalf,
    /// Index of tomorrow's daytime segment
    pub next_day_offset: usize,
    /// Exclusive bound for day-pair stepping
    pub last_index: usize,
}

impl ForecastWindow {
    /// Whether today is represented by a full day/night pair
    pub fn full_day(&self) -> bool {
        self.current_half == DayHalf::Daytime
    }
}

/// Classifies the forecast window by the label of segment 0
pub fn classify_window(segments: &[Forecast]) -> Result<ForecastWindow, NormalizeError> {
    let label = segments
        .first()
        .ok_or_else(|| NormalizeError::MalformedWindow("forecast group has no segments".to_string()))?
        .period_label();

    match label {
        Some(DAYTIME_CURRENT_LABEL) => Ok(ForecastWindow {
            current_half: DayHalf::Daytime,
            next_day_offset: 2,
            last_index: 12,
        }),
        Some(NIGHTTIME_CURRENT_LABEL) => Ok(ForecastWindow {
            current_half: DayHalf::Nighttime,
            next_day_offset: 1,
            last_index: 11,
        }),
        Some(other) => Err(NormalizeError::MalformedWindow(format!(
            "unexpected first period '{}'",
            other
        ))),
        None => Err(NormalizeError::MalformedWindow(
            "first period has no label".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SiteData;

    fn segments_with_first_label(label: &str) -> SiteData {
        let xml = format!(
            r#"<siteData><forecastGroup>
                <forecast><period textForecastName="{}">Monday</period></forecast>
                <forecast><period textForecastName="Monday night">Monday night</period></forecast>
            </forecastGroup></siteData>"#,
            label
        );
        SiteData::from_xml(&xml).expect("Failed to parse")
    }

    #[test]
    fn test_today_is_full_day_window() {
        let doc = segments_with_first_label("Today");
        let window = classify_window(doc.forecasts()).expect("Should classify");
        assert_eq!(window.current_half, DayHalf::Daytime);
        assert_eq!(window.next_day_offset, 2);
        assert_eq!(window.last_index, 12);
        assert!(window.full_day());
    }

    #[test]
    fn test_tonight_is_half_day_window() {
        let doc = segments_with_first_label("Tonight");
        let window = classify_window(doc.forecasts()).expect("Should classify");
        assert_eq!(window.current_half, DayHalf::Nighttime);
        assert_eq!(window.next_day_offset, 1);
        assert_eq!(window.last_index, 11);
        assert!(!window.full_day());
    }

    #[test]
    fn test_other_label_is_malformed() {
        let doc = segments_with_first_label("Tuesday");
        let result = classify_window(doc.forecasts());
        match result {
            Err(NormalizeError::MalformedWindow(msg)) => assert!(msg.contains("Tuesday")),
            other => panic!("Expected MalformedWindow, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_label_is_malformed() {
        let doc = SiteData::from_xml(
            "<siteData><forecastGroup><forecast><period>Monday</period></forecast></forecastGroup></siteData>",
        )
        .expect("Failed to parse");
        assert!(matches!(
            classify_window(doc.forecasts()),
            Err(NormalizeError::MalformedWindow(_))
        ));
    }

    #[test]
    fn test_empty_window_is_malformed() {
        assert!(matches!(
            classify_window(&[]),
            Err(NormalizeError::MalformedWindow(_))
        ));
    }
}
