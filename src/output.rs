//! Output formatting and persistence for query results.
//!
//! Supports pretty-printing, JSON serialization, headline logging and
//! per-view CSV tables.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::pipeline::types::{Dashboard, Summary, Views};

/// Logs a dashboard using Rust's debug pretty-print format.
pub fn print_pretty(dashboard: &Dashboard) {
    debug!("{:#?}", dashboard);
}

/// Renders a dashboard as pretty-printed JSON.
pub fn to_json(dashboard: &Dashboard) -> Result<String> {
    Ok(serde_json::to_string_pretty(dashboard)?)
}

/// Logs the headline metrics of a summary.
pub fn log_summary(summary: &Summary) {
    info!(
        total = summary.totals.total,
        casual = summary.totals.casual,
        registered = summary.totals.registered,
        "Usage totals"
    );
    info!(
        tier = summary.tier.tier.label(),
        days = summary.tier.days,
        mean_daily_total = summary.tier.mean_daily_total,
        "Most common rental tier"
    );
    info!(
        bucket = summary.popular_time.bucket.label(),
        range = summary.popular_time.clock_range,
        "Most popular time of day"
    );
    info!(
        user_type = summary.majority_user.user_type.label(),
        average = summary.majority_user.average,
        "Majority user type"
    );
    info!(
        temp = summary.environment.temp,
        atemp = summary.environment.atemp,
        humidity = summary.environment.humidity,
        windspeed = summary.environment.windspeed,
        "Environment averages"
    );
}

/// Writes rows to a CSV file with a header, replacing any existing file.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "Wrote CSV table");
    Ok(())
}

/// Writes every view as `<dir>/<view>.csv`, creating `dir` if needed.
pub fn export_views(dir: &Path, views: &Views) -> Result<()> {
    fs::create_dir_all(dir)?;

    write_table(&dir.join("daily.csv"), &views.daily)?;
    write_table(&dir.join("tier_counts.csv"), &views.tier_counts)?;
    write_table(&dir.join("monthly.csv"), &views.monthly)?;
    write_table(&dir.join("weekday.csv"), &views.weekday)?;
    write_table(&dir.join("user_type.csv"), &views.user_type)?;
    write_table(&dir.join("day_type.csv"), &views.day_type)?;
    write_table(&dir.join("season.csv"), &views.season)?;
    write_table(&dir.join("weather.csv"), &views.weather)?;
    write_table(&dir.join("time_bucket.csv"), &views.time_bucket)?;
    write_table(&dir.join("dominance.csv"), &views.dominance)?;

    info!(dir = %dir.display(), "Exported views");
    Ok(())
}
