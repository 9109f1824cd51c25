use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::PipelineResult;
use crate::pipeline::filter::FilterSelection;

/// A selection as written by a user, stored as a JSON object on disk:
/// ```json
/// {
///   "start_date": "2011-06-01",
///   "end_date": "2011-08-31",
///   "start_hour": 6,
///   "end_hour": 20,
///   "seasons": [2, 3],
///   "weathers": [1, 2],
///   "day_types": [0]
/// }
/// ```
///
/// Omitted fields select everything (dates fall back to the dataset span).
/// An explicit empty list selects nothing for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_hour: Option<u8>,
    pub end_hour: Option<u8>,
    pub seasons: Option<Vec<u8>>,
    pub weathers: Option<Vec<u8>>,
    pub day_types: Option<Vec<u8>>,
}

impl SelectionConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read selection file '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid selection file '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Fields set in `overrides` replace the ones in `self`.
    pub fn merged_with(self, overrides: SelectionConfig) -> Self {
        Self {
            start_date: overrides.start_date.or(self.start_date),
            end_date: overrides.end_date.or(self.end_date),
            start_hour: overrides.start_hour.or(self.start_hour),
            end_hour: overrides.end_hour.or(self.end_hour),
            seasons: overrides.seasons.or(self.seasons),
            weathers: overrides.weathers.or(self.weathers),
            day_types: overrides.day_types.or(self.day_types),
        }
    }

    /// Turns the config into a validated [`FilterSelection`], using
    /// `span` for missing dates.
    pub fn resolve(&self, span: (NaiveDate, NaiveDate)) -> PipelineResult<FilterSelection> {
        let seasons = self.seasons.as_deref().unwrap_or(&[1, 2, 3, 4][..]);
        let weathers = self.weathers.as_deref().unwrap_or(&[1, 2, 3, 4][..]);
        let day_types = self.day_types.as_deref().unwrap_or(&[0, 1, 2][..]);

        FilterSelection::from_codes(
            self.start_date.unwrap_or(span.0),
            self.end_date.unwrap_or(span.1),
            (self.start_hour.unwrap_or(0), self.end_hour.unwrap_or(23)),
            seasons,
            weathers,
            day_types,
        )
    }
}
