//! Hourly rental records and the coded dimensions they carry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One hour of observation, already typed by the parser.
///
/// Codes are kept raw here; the feature deriver validates them and turns
/// them into [`Season`] / [`Weather`] values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourRecord {
    pub date: NaiveDate,
    pub hour: u8,
    pub year: i32,
    pub season: u8,
    pub weather: u8,
    pub working_day: u8,
    pub holiday: u8,
    pub weekday: u8,

    // counts
    pub casual: u64,
    pub registered: u64,
    pub total: u64,

    // environment (normalized, as published)
    pub temp: f64,
    pub atemp: f64,
    pub humidity: f64,
    pub windspeed: f64,
}

impl HourRecord {
    /// Checks `total == casual + registered`.
    pub fn counts_consistent(&self) -> bool {
        self.casual
            .checked_add(self.registered)
            .is_some_and(|sum| sum == self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Season::Spring),
            2 => Some(Season::Summer),
            3 => Some(Season::Fall),
            4 => Some(Season::Winter),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Fall => 3,
            Season::Winter => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Mist,
    #[serde(rename = "Light Precipitation")]
    LightPrecipitation,
    #[serde(rename = "Heavy Precipitation")]
    HeavyPrecipitation,
}

impl Weather {
    pub const ALL: [Weather; 4] = [
        Weather::Clear,
        Weather::Mist,
        Weather::LightPrecipitation,
        Weather::HeavyPrecipitation,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Weather::Clear),
            2 => Some(Weather::Mist),
            3 => Some(Weather::LightPrecipitation),
            4 => Some(Weather::HeavyPrecipitation),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Weather::Clear => 1,
            Weather::Mist => 2,
            Weather::LightPrecipitation => 3,
            Weather::HeavyPrecipitation => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Mist => "Mist",
            Weather::LightPrecipitation => "Light Precipitation",
            Weather::HeavyPrecipitation => "Heavy Precipitation",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.label() == label)
    }
}

/// Weekday name for the dataset's 0-based index (0 = Sunday).
pub fn weekday_name(index: u8) -> Option<&'static str> {
    const NAMES: [&str; 7] = [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ];
    NAMES.get(index as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_code_roundtrip() {
        for code in 1..=4 {
            let season = Season::from_code(code).unwrap();
            assert_eq!(season.code(), code);
            assert_eq!(Season::from_label(season.label()), Some(season));
        }
        assert_eq!(Season::from_code(0), None);
        assert_eq!(Season::from_code(5), None);
    }

    #[test]
    fn test_weather_code_roundtrip() {
        for code in 1..=4 {
            let weather = Weather::from_code(code).unwrap();
            assert_eq!(weather.code(), code);
            assert_eq!(Weather::from_label(weather.label()), Some(weather));
        }
        assert_eq!(Weather::from_code(9), None);
        assert_eq!(Weather::from_label("Sunny"), None);
    }

    #[test]
    fn test_weather_serializes_as_label() {
        let json = serde_json::to_string(&Weather::LightPrecipitation).unwrap();
        assert_eq!(json, "\"Light Precipitation\"");
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(0), Some("Sunday"));
        assert_eq!(weekday_name(6), Some("Saturday"));
        assert_eq!(weekday_name(7), None);
    }

    #[test]
    fn test_counts_consistent() {
        let mut record = sample_record();
        assert!(record.counts_consistent());

        record.total = 11;
        assert!(!record.counts_consistent());
    }

    fn sample_record() -> HourRecord {
        HourRecord {
            date: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
            hour: 0,
            year: 2011,
            season: 1,
            weather: 1,
            working_day: 0,
            holiday: 0,
            weekday: 6,
            casual: 3,
            registered: 13,
            total: 16,
            temp: 0.24,
            atemp: 0.2879,
            humidity: 0.81,
            windspeed: 0.0,
        }
    }
}
