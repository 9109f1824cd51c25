//! Classification fields derived from raw record columns.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::record::{HourRecord, Season, Weather};

/// Time-of-day bucket. Variant order is the clock order of the buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeBucket {
    #[serde(rename = "Dini Hari")]
    DiniHari,
    Pagi,
    Siang,
    Sore,
    Malam,
}

impl TimeBucket {
    pub const ALL: [TimeBucket; 5] = [
        TimeBucket::DiniHari,
        TimeBucket::Pagi,
        TimeBucket::Siang,
        TimeBucket::Sore,
        TimeBucket::Malam,
    ];

    /// Buckets are half-open: `[0,6) [6,11) [11,15) [15,18) [18,24)`.
    ///
    /// Returns `None` for hours outside `0..=23`.
    pub fn from_hour(hour: u8) -> Option<Self> {
        match hour {
            0..=5 => Some(TimeBucket::DiniHari),
            6..=10 => Some(TimeBucket::Pagi),
            11..=14 => Some(TimeBucket::Siang),
            15..=17 => Some(TimeBucket::Sore),
            18..=23 => Some(TimeBucket::Malam),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeBucket::DiniHari => "Dini Hari",
            TimeBucket::Pagi => "Pagi",
            TimeBucket::Siang => "Siang",
            TimeBucket::Sore => "Sore",
            TimeBucket::Malam => "Malam",
        }
    }

    pub fn clock_range(self) -> &'static str {
        match self {
            TimeBucket::DiniHari => "00:00 - 05:59",
            TimeBucket::Pagi => "06:00 - 10:59",
            TimeBucket::Siang => "11:00 - 14:59",
            TimeBucket::Sore => "15:00 - 17:59",
            TimeBucket::Malam => "18:00 - 23:59",
        }
    }
}

/// Day-type bucket, coded 0 / 1 / 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayType {
    Workday,
    Weekend,
    Holiday,
}

impl DayType {
    pub const ALL: [DayType; 3] = [DayType::Workday, DayType::Weekend, DayType::Holiday];

    /// Holiday wins over the working-day flag.
    pub fn classify(working_day: bool, holiday: bool) -> Self {
        if holiday {
            DayType::Holiday
        } else if working_day {
            DayType::Workday
        } else {
            DayType::Weekend
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DayType::Workday),
            1 => Some(DayType::Weekend),
            2 => Some(DayType::Holiday),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            DayType::Workday => 0,
            DayType::Weekend => 1,
            DayType::Holiday => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayType::Workday => "Workday",
            DayType::Weekend => "Weekend",
            DayType::Holiday => "Holiday",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }
}

/// Which user group dominates a single hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UserDominance {
    #[serde(rename = "Majority Casual")]
    MajorityCasual,
    #[serde(rename = "Majority Registered")]
    MajorityRegistered,
}

impl UserDominance {
    /// Ties go to registered.
    pub fn classify(casual: u64, registered: u64) -> Self {
        if casual > registered {
            UserDominance::MajorityCasual
        } else {
            UserDominance::MajorityRegistered
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UserDominance::MajorityCasual => "Majority Casual",
            UserDominance::MajorityRegistered => "Majority Registered",
        }
    }
}

/// A validated record with its derived categories attached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedRecord {
    pub record: HourRecord,
    pub season: Season,
    pub weather: Weather,
    pub day_type: DayType,
    pub time_bucket: TimeBucket,
    pub dominance: UserDominance,
}

/// Output of [`derive_all`]: the accepted records and how many were dropped.
#[derive(Debug, Clone, Default)]
pub struct Derivation {
    pub records: Vec<DerivedRecord>,
    pub rejected: usize,
}

/// Validates one record and computes its categories.
///
/// `row` is only used to label the error.
pub fn derive(row: usize, record: &HourRecord) -> PipelineResult<DerivedRecord> {
    let malformed = |reason: String| PipelineError::MalformedRecord { row, reason };

    if !record.counts_consistent() {
        return Err(malformed(format!(
            "total {} != casual {} + registered {}",
            record.total, record.casual, record.registered
        )));
    }

    let time_bucket = TimeBucket::from_hour(record.hour)
        .ok_or_else(|| malformed(format!("hour {} out of range", record.hour)))?;
    let season = Season::from_code(record.season)
        .ok_or_else(|| malformed(format!("unknown season code {}", record.season)))?;
    let weather = Weather::from_code(record.weather)
        .ok_or_else(|| malformed(format!("unknown weather code {}", record.weather)))?;

    if record.weekday > 6 {
        return Err(malformed(format!("weekday {} out of range", record.weekday)));
    }
    if record.year != record.date.year() {
        return Err(malformed(format!(
            "year {} does not match date {}",
            record.year, record.date
        )));
    }
    let working_day = flag(record.working_day)
        .ok_or_else(|| malformed(format!("workingday flag {} is not 0/1", record.working_day)))?;
    let holiday = flag(record.holiday)
        .ok_or_else(|| malformed(format!("holiday flag {} is not 0/1", record.holiday)))?;

    Ok(DerivedRecord {
        record: *record,
        season,
        weather,
        day_type: DayType::classify(working_day, holiday),
        time_bucket,
        dominance: UserDominance::classify(record.casual, record.registered),
    })
}

fn flag(value: u8) -> Option<bool> {
    match value {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

/// Derives every record, excluding and counting the malformed ones.
#[tracing::instrument(skip(records), fields(input = records.len()))]
pub fn derive_all(records: &[HourRecord]) -> Derivation {
    let mut out = Derivation {
        records: Vec::with_capacity(records.len()),
        rejected: 0,
    };

    for (row, record) in records.iter().enumerate() {
        match derive(row, record) {
            Ok(derived) => out.records.push(derived),
            Err(e) => {
                warn!(error = %e, "Rejected record");
                out.rejected += 1;
            }
        }
    }

    debug!(
        accepted = out.records.len(),
        rejected = out.rejected,
        "Derived categories"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_time_bucket_partitions_all_hours() {
        let mut seen = Vec::new();
        for hour in 0..24u8 {
            let bucket = TimeBucket::from_hour(hour).expect("every hour has a bucket");
            if seen.last() != Some(&bucket) {
                seen.push(bucket);
            }
        }
        // buckets appear once each, in clock order, with no gaps
        assert_eq!(seen, TimeBucket::ALL.to_vec());
        assert_eq!(TimeBucket::from_hour(24), None);
    }

    #[test]
    fn test_time_bucket_boundaries() {
        assert_eq!(TimeBucket::from_hour(5), Some(TimeBucket::DiniHari));
        assert_eq!(TimeBucket::from_hour(6), Some(TimeBucket::Pagi));
        assert_eq!(TimeBucket::from_hour(10), Some(TimeBucket::Pagi));
        assert_eq!(TimeBucket::from_hour(11), Some(TimeBucket::Siang));
        assert_eq!(TimeBucket::from_hour(14), Some(TimeBucket::Siang));
        assert_eq!(TimeBucket::from_hour(15), Some(TimeBucket::Sore));
        assert_eq!(TimeBucket::from_hour(17), Some(TimeBucket::Sore));
        assert_eq!(TimeBucket::from_hour(18), Some(TimeBucket::Malam));
        assert_eq!(TimeBucket::from_hour(23), Some(TimeBucket::Malam));
    }

    #[test]
    fn test_hour_five_and_six_split() {
        let early = derive(0, &record_at(5, 1, 2)).unwrap();
        let morning = derive(1, &record_at(6, 1, 2)).unwrap();

        assert_eq!(early.time_bucket.label(), "Dini Hari");
        assert_eq!(morning.time_bucket.label(), "Pagi");
    }

    #[test]
    fn test_day_type_classification() {
        assert_eq!(DayType::classify(true, false), DayType::Workday);
        assert_eq!(DayType::classify(false, false), DayType::Weekend);
        assert_eq!(DayType::classify(false, true), DayType::Holiday);
        // holiday takes precedence
        assert_eq!(DayType::classify(true, true), DayType::Holiday);
    }

    #[test]
    fn test_day_type_code_roundtrip() {
        for code in 0..=2 {
            let day_type = DayType::from_code(code).unwrap();
            assert_eq!(day_type.code(), code);
            assert_eq!(DayType::from_label(day_type.label()), Some(day_type));
        }
        assert_eq!(DayType::from_code(3), None);
    }

    #[test]
    fn test_dominance_tie_goes_to_registered() {
        assert_eq!(UserDominance::classify(10, 5), UserDominance::MajorityCasual);
        assert_eq!(UserDominance::classify(5, 10), UserDominance::MajorityRegistered);
        assert_eq!(UserDominance::classify(7, 7), UserDominance::MajorityRegistered);
    }

    #[test]
    fn test_derive_preserves_counts() {
        let record = record_at(8, 4, 30);
        let derived = derive(0, &record).unwrap();

        assert_eq!(derived.record, record);
        assert_eq!(
            derived.record.total,
            derived.record.casual + derived.record.registered
        );
    }

    #[test]
    fn test_derive_rejects_inconsistent_total() {
        let mut record = record_at(8, 4, 30);
        record.total = 35;

        let err = derive(3, &record).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedRecord { row: 3, .. }));
    }

    #[test]
    fn test_derive_rejects_bad_codes() {
        let mut bad_season = record_at(8, 1, 1);
        bad_season.season = 0;
        assert!(derive(0, &bad_season).is_err());

        let mut bad_weather = record_at(8, 1, 1);
        bad_weather.weather = 5;
        assert!(derive(0, &bad_weather).is_err());

        let mut bad_hour = record_at(8, 1, 1);
        bad_hour.hour = 24;
        assert!(derive(0, &bad_hour).is_err());

        let mut bad_weekday = record_at(8, 1, 1);
        bad_weekday.weekday = 7;
        assert!(derive(0, &bad_weekday).is_err());

        let mut bad_year = record_at(8, 1, 1);
        bad_year.year = 2012;
        assert!(derive(0, &bad_year).is_err());
    }

    #[test]
    fn test_derive_rejects_non_binary_flags() {
        let mut bad_holiday = record_at(8, 1, 1);
        bad_holiday.holiday = 7;
        assert!(matches!(
            derive(4, &bad_holiday),
            Err(PipelineError::MalformedRecord { row: 4, .. })
        ));

        let mut bad_working_day = record_at(8, 1, 1);
        bad_working_day.working_day = 2;
        assert!(derive(0, &bad_working_day).is_err());

        let mut holiday = record_at(8, 1, 1);
        holiday.holiday = 1;
        assert_eq!(derive(0, &holiday).unwrap().day_type, DayType::Holiday);
    }

    #[test]
    fn test_derive_all_counts_rejections() {
        let mut broken = record_at(9, 1, 1);
        broken.total = 0;
        let records = vec![record_at(8, 1, 1), broken, record_at(10, 2, 2)];

        let derivation = derive_all(&records);

        assert_eq!(derivation.records.len(), 2);
        assert_eq!(derivation.rejected, 1);
        assert_eq!(derivation.records[1].record.hour, 10);
    }

    fn record_at(hour: u8, casual: u64, registered: u64) -> HourRecord {
        HourRecord {
            date: NaiveDate::from_ymd_opt(2011, 3, 14).unwrap(),
            hour,
            year: 2011,
            season: 1,
            weather: 1,
            working_day: 1,
            holiday: 0,
            weekday: 1,
            casual,
            registered,
            total: casual + registered,
            temp: 0.3,
            atemp: 0.3,
            humidity: 0.5,
            windspeed: 0.2,
        }
    }
}
