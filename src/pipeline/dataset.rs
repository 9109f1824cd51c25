use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::error::PipelineResult;
use crate::pipeline::aggregate::aggregate_views;
use crate::pipeline::features::{DerivedRecord, derive_all};
use crate::pipeline::filter::FilterSelection;
use crate::pipeline::summary::summarize;
use crate::pipeline::types::Dashboard;
use crate::record::HourRecord;

/// Immutable snapshot of the derived dataset.
///
/// Categories are computed once on construction; every query reads the
/// snapshot and builds fresh views from it.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<DerivedRecord>,
    rejected: usize,
}

impl Dataset {
    pub fn new(raw: &[HourRecord]) -> Self {
        let derivation = derive_all(raw);
        if derivation.rejected > 0 {
            warn!(
                rejected = derivation.rejected,
                "Excluded malformed records from the dataset"
            );
        }
        info!(records = derivation.records.len(), "Dataset ready");

        Self {
            records: derivation.records,
            rejected: derivation.rejected,
        }
    }

    pub fn records(&self) -> &[DerivedRecord] {
        &self.records
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// First and last date present, if any record survived derivation.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.record.date).min()?;
        let last = self.records.iter().map(|r| r.record.date).max()?;
        Some((first, last))
    }

    /// Selection covering the whole dataset.
    pub fn default_selection(&self) -> Option<FilterSelection> {
        self.date_span()
            .map(|(start, end)| FilterSelection::full_range(start, end))
    }

    /// Runs filter, aggregation and summary for one selection.
    ///
    /// # Errors
    ///
    /// `InvalidSelection` before anything is filtered, or `EmptyResult`
    /// when the selection matches no records.
    #[tracing::instrument(skip_all, fields(
        start = %selection.start_date,
        end = %selection.end_date,
        hours = ?(selection.start_hour, selection.end_hour),
    ))]
    pub fn query(&self, selection: &FilterSelection) -> PipelineResult<Dashboard> {
        let filtered = selection.apply(&self.records)?;
        let views = aggregate_views(&filtered)?;
        let summary = summarize(&views, &filtered)?;

        info!(matched = filtered.len(), "Query complete");

        Ok(Dashboard {
            schema_version: 1,
            generated_at: Utc::now(),
            selection: selection.clone(),
            matched_records: filtered.len(),
            rejected_records: self.rejected,
            views,
            summary,
        })
    }
}
