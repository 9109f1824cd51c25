//! Multi-predicate record filtering.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::features::{DayType, DerivedRecord};
use crate::record::{Season, Weather};

/// The active query window. Every predicate is ANDed.
///
/// An empty set for a dimension means nothing passes that dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_hour: u8,
    pub end_hour: u8,
    pub seasons: BTreeSet<Season>,
    pub weathers: BTreeSet<Weather>,
    pub day_types: BTreeSet<DayType>,
}

impl FilterSelection {
    /// Selects every hour, season, weather and day type between two dates.
    pub fn full_range(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            start_hour: 0,
            end_hour: 23,
            seasons: Season::ALL.into_iter().collect(),
            weathers: Weather::ALL.into_iter().collect(),
            day_types: DayType::ALL.into_iter().collect(),
        }
    }

    /// Builds a selection from raw codes, rejecting unknown ones.
    pub fn from_codes(
        start_date: NaiveDate,
        end_date: NaiveDate,
        hours: (u8, u8),
        season_codes: &[u8],
        weather_codes: &[u8],
        day_type_codes: &[u8],
    ) -> PipelineResult<Self> {
        fn decode<T: Ord>(
            codes: &[u8],
            what: &str,
            from_code: impl Fn(u8) -> Option<T>,
        ) -> PipelineResult<BTreeSet<T>> {
            codes
                .iter()
                .map(|&c| {
                    from_code(c).ok_or_else(|| {
                        PipelineError::InvalidSelection(format!("unknown {what} code {c}"))
                    })
                })
                .collect()
        }

        let selection = Self {
            start_date,
            end_date,
            start_hour: hours.0,
            end_hour: hours.1,
            seasons: decode(season_codes, "season", Season::from_code)?,
            weathers: decode(weather_codes, "weather", Weather::from_code)?,
            day_types: decode(day_type_codes, "day type", DayType::from_code)?,
        };
        selection.validate()?;
        Ok(selection)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.start_date > self.end_date {
            return Err(PipelineError::InvalidSelection(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        if self.start_hour > self.end_hour {
            return Err(PipelineError::InvalidSelection(format!(
                "start hour {} is after end hour {}",
                self.start_hour, self.end_hour
            )));
        }
        if self.end_hour > 23 {
            return Err(PipelineError::InvalidSelection(format!(
                "end hour {} out of range",
                self.end_hour
            )));
        }
        Ok(())
    }

    pub fn matches(&self, r: &DerivedRecord) -> bool {
        (self.start_date..=self.end_date).contains(&r.record.date)
            && (self.start_hour..=self.end_hour).contains(&r.record.hour)
            && self.seasons.contains(&r.season)
            && self.weathers.contains(&r.weather)
            && self.day_types.contains(&r.day_type)
    }

    /// Returns the records that satisfy every predicate.
    ///
    /// The selection is validated first; nothing is filtered if it is invalid.
    pub fn apply(&self, records: &[DerivedRecord]) -> PipelineResult<Vec<DerivedRecord>> {
        self.validate()?;

        if self.seasons.is_empty() || self.weathers.is_empty() || self.day_types.is_empty() {
            debug!("Selection has an empty category set, nothing passes");
            return Ok(Vec::new());
        }

        let subset: Vec<DerivedRecord> =
            records.iter().filter(|r| self.matches(r)).copied().collect();

        debug!(input = records.len(), output = subset.len(), "Filtered records");
        Ok(subset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::features::derive_all;
    use crate::record::HourRecord;

    #[test]
    fn test_full_range_keeps_everything() {
        let records = sample_records();
        let subset = full().apply(&records).unwrap();
        assert_eq!(subset, records);
    }

    #[test]
    fn test_hour_range_is_inclusive() {
        let records = sample_records();
        let mut selection = full();
        selection.start_hour = 6;
        selection.end_hour = 8;

        let subset = selection.apply(&records).unwrap();
        assert!(subset.iter().all(|r| (6..=8).contains(&r.record.hour)));
        assert_eq!(subset.len(), 9);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let records = sample_records();
        let mut selection = full();
        selection.start_date = day(2);
        selection.end_date = day(2);

        let subset = selection.apply(&records).unwrap();
        assert_eq!(subset.len(), 12);
        assert!(subset.iter().all(|r| r.record.date == day(2)));
    }

    #[test]
    fn test_empty_season_set_yields_nothing() {
        let records = sample_records();
        let mut selection = full();
        selection.seasons.clear();

        assert!(selection.apply(&records).unwrap().is_empty());
    }

    #[test]
    fn test_day_type_filter() {
        let records = sample_records();
        let mut selection = full();
        selection.day_types = BTreeSet::from([DayType::Holiday]);

        let subset = selection.apply(&records).unwrap();
        // day 3 is flagged both working day and holiday
        assert_eq!(subset.len(), 12);
        assert!(subset.iter().all(|r| r.record.date == day(3)));
    }

    #[test]
    fn test_narrower_selection_is_subset_of_wider() {
        let records = sample_records();
        let wide = full();
        let mut narrow = full();
        narrow.start_hour = 3;
        narrow.end_hour = 9;
        narrow.weathers = BTreeSet::from([Weather::Clear]);

        let wide_out = wide.apply(&records).unwrap();
        let narrow_out = narrow.apply(&records).unwrap();

        assert!(narrow_out.len() < wide_out.len());
        assert!(narrow_out.iter().all(|r| wide_out.contains(r)));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = sample_records();
        let mut selection = full();
        selection.start_hour = 4;
        selection.end_hour = 7;

        let once = selection.apply(&records).unwrap();
        let twice = selection.apply(&once).unwrap();
        let widened = full().apply(&once).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once, widened);
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        let records = sample_records();

        let mut reversed_dates = full();
        reversed_dates.start_date = day(3);
        reversed_dates.end_date = day(1);
        assert!(matches!(
            reversed_dates.apply(&records),
            Err(PipelineError::InvalidSelection(_))
        ));

        let mut reversed_hours = full();
        reversed_hours.start_hour = 10;
        reversed_hours.end_hour = 9;
        assert!(reversed_hours.validate().is_err());

        let mut past_midnight = full();
        past_midnight.end_hour = 24;
        assert!(past_midnight.validate().is_err());
    }

    #[test]
    fn test_from_codes_rejects_unknown_code() {
        let err = FilterSelection::from_codes(day(1), day(3), (0, 23), &[1, 5], &[1], &[0])
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::InvalidSelection("unknown season code 5".into())
        );

        let ok = FilterSelection::from_codes(day(1), day(3), (0, 23), &[1, 2], &[1], &[0, 2])
            .unwrap();
        assert_eq!(ok.seasons, BTreeSet::from([Season::Spring, Season::Summer]));
        assert_eq!(ok.day_types, BTreeSet::from([DayType::Workday, DayType::Holiday]));
    }

    fn full() -> FilterSelection {
        FilterSelection::full_range(day(1), day(3))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 1, d).unwrap()
    }

    /// Three days of 12 hours each: a weekend, a workday, and a holiday
    /// that is also flagged as a working day. Odd hours are misty.
    fn sample_records() -> Vec<DerivedRecord> {
        let mut raw = Vec::new();
        for d in 1..=3u32 {
            for hour in 0..12u8 {
                raw.push(HourRecord {
                    date: day(d),
                    hour,
                    year: 2011,
                    season: 1,
                    weather: if hour % 2 == 0 { 1 } else { 2 },
                    working_day: u8::from(d != 1),
                    holiday: u8::from(d == 3),
                    weekday: (5 + d as u8) % 7,
                    casual: 1,
                    registered: u64::from(hour),
                    total: 1 + u64::from(hour),
                    temp: 0.2,
                    atemp: 0.2,
                    humidity: 0.6,
                    windspeed: 0.1,
                });
            }
        }
        derive_all(&raw).records
    }
}
