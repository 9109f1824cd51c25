//! CSV parser for the hourly bike-share dataset (`hour.csv` layout).

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::record::HourRecord;

/// First calendar year of the dataset; the `yr` column is an offset from it.
pub const BASE_YEAR: i32 = 2011;

/// A single row as it appears in the source CSV.
#[derive(Debug, Deserialize)]
struct RawRow {
    dteday: NaiveDate,
    season: u8,
    yr: u8,
    hr: u8,
    holiday: u8,
    weekday: u8,
    workingday: u8,
    weathersit: u8,
    temp: f64,
    atemp: f64,
    hum: f64,
    windspeed: f64,
    casual: u64,
    registered: u64,
    cnt: u64,
}

impl From<RawRow> for HourRecord {
    fn from(row: RawRow) -> Self {
        HourRecord {
            date: row.dteday,
            hour: row.hr,
            year: BASE_YEAR + i32::from(row.yr),
            season: row.season,
            weather: row.weathersit,
            working_day: row.workingday,
            holiday: row.holiday,
            weekday: row.weekday,
            casual: row.casual,
            registered: row.registered,
            total: row.cnt,
            temp: row.temp,
            atemp: row.atemp,
            humidity: row.hum,
            windspeed: row.windspeed,
        }
    }
}

/// Decodes hourly records from CSV bytes with a header row.
///
/// Extra columns (`instant`, `mnth`) are ignored. Value-level checks such as
/// code ranges are left to the feature deriver.
///
/// # Errors
///
/// Returns an error if a row cannot be deserialized, naming the 1-based data row.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<HourRecord>> {
    let mut rdr = csv::Reader::from_reader(bytes);
    let mut records = Vec::new();

    for (index, result) in rdr.deserialize::<RawRow>().enumerate() {
        let row = result.with_context(|| format!("failed to parse CSV row {}", index + 1))?;
        records.push(HourRecord::from(row));
    }

    debug!(rows = records.len(), "Parsed hourly records");
    Ok(records)
}

/// Reads and parses a dataset file from disk.
pub fn load_records(path: &str) -> Result<Vec<HourRecord>> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read dataset '{path}'"))?;
    parse_records(&bytes)
}
