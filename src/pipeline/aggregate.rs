use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::features::DerivedRecord;
use crate::pipeline::tier::{RentalTier, tier};
use crate::pipeline::types::{
    BreakdownRow, DailyRow, DominanceRow, MonthlyRow, TierCountRow, UserType, UserTypeRow, Views,
    WeekdayRow,
};
use crate::record::weekday_name;

/// Computes every aggregation view over a filtered record set.
///
/// Views are independent of each other. Time series come out in calendar
/// order and breakdowns in (year, category) order, since all grouping goes
/// through `BTreeMap`s keyed by ordered types.
///
/// # Errors
///
/// [`PipelineError::EmptyResult`] when `records` is empty.
#[tracing::instrument(skip(records), fields(records = records.len()))]
pub fn aggregate_views(records: &[DerivedRecord]) -> PipelineResult<Views> {
    if records.is_empty() {
        return Err(PipelineError::EmptyResult);
    }

    let daily = daily_series(records);
    let views = Views {
        tier_counts: tier_counts(&daily),
        daily,
        monthly: monthly_series(records),
        weekday: weekday_series(records),
        user_type: user_type_series(records),
        day_type: breakdown(records, |r| r.day_type),
        season: breakdown(records, |r| r.season),
        weather: breakdown(records, |r| r.weather),
        time_bucket: breakdown(records, |r| r.time_bucket),
        dominance: dominance_counts(records),
    };

    debug!(
        days = views.daily.len(),
        months = views.monthly.len(),
        "Aggregated views"
    );
    Ok(views)
}

/// One row per calendar day from the first to the last record's date.
///
/// Days without records are filled with zero counts (tier Low) and take
/// their year from the date.
pub fn daily_series(records: &[DerivedRecord]) -> Vec<DailyRow> {
    // (year, casual, registered, total); year comes from the first record seen
    let mut days: BTreeMap<NaiveDate, (i32, u64, u64, u64)> = BTreeMap::new();

    for r in records {
        let day = days
            .entry(r.record.date)
            .or_insert((r.record.year, 0, 0, 0));
        day.1 = day.1.saturating_add(r.record.casual);
        day.2 = day.2.saturating_add(r.record.registered);
        day.3 = day.3.saturating_add(r.record.total);
    }

    let (Some(&first), Some(&last)) = (days.keys().next(), days.keys().next_back()) else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| {
            let (year, casual, registered, total) =
                days.get(&date).copied().unwrap_or((date.year(), 0, 0, 0));
            DailyRow {
                date,
                year,
                casual,
                registered,
                total,
                tier: tier(total),
            }
        })
        .collect()
}

/// One row per calendar month from the first to the last record's month,
/// zero-filled like [`daily_series`].
pub fn monthly_series(records: &[DerivedRecord]) -> Vec<MonthlyRow> {
    let mut months: BTreeMap<(i32, u32), u64> = BTreeMap::new();

    for r in records {
        let date = r.record.date;
        let total = months.entry((date.year(), date.month())).or_default();
        *total = total.saturating_add(r.record.total);
    }

    let (Some(&first), Some(&last)) = (months.keys().next(), months.keys().next_back()) else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    let (mut year, mut month) = first;
    while (year, month) <= last {
        rows.push(MonthlyRow {
            year,
            month,
            month_name: NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%B").to_string())
                .unwrap_or_default(),
            total: months.get(&(year, month)).copied().unwrap_or(0),
        });
        (year, month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    }
    rows
}

/// Days per (year, tier) over the zero-filled daily series.
pub fn tier_counts(daily: &[DailyRow]) -> Vec<TierCountRow> {
    let mut counts: BTreeMap<(i32, RentalTier), usize> = BTreeMap::new();

    for d in daily {
        *counts.entry((d.year, d.tier)).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((year, tier), days)| TierCountRow { year, tier, days })
        .collect()
}

pub fn weekday_series(records: &[DerivedRecord]) -> Vec<WeekdayRow> {
    let mut weeks: BTreeMap<(i32, u8), u64> = BTreeMap::new();

    for r in records {
        let total = weeks.entry((r.record.year, r.record.weekday)).or_default();
        *total = total.saturating_add(r.record.total);
    }

    weeks
        .into_iter()
        .map(|((year, weekday), total)| WeekdayRow {
            year,
            weekday,
            // weekday was range-checked during derivation
            weekday_name: weekday_name(weekday).unwrap_or("Unknown"),
            total,
        })
        .collect()
}

/// Sums casual and registered per year, then melts the two columns into
/// one row per (year, user type).
pub fn user_type_series(records: &[DerivedRecord]) -> Vec<UserTypeRow> {
    let mut years: BTreeMap<i32, (u64, u64)> = BTreeMap::new();

    for r in records {
        let year = years.entry(r.record.year).or_default();
        year.0 = year.0.saturating_add(r.record.casual);
        year.1 = year.1.saturating_add(r.record.registered);
    }

    years
        .into_iter()
        .flat_map(|(year, (casual, registered))| {
            [
                UserTypeRow {
                    year,
                    user_type: UserType::Casual,
                    rentals: casual,
                },
                UserTypeRow {
                    year,
                    user_type: UserType::Registered,
                    rentals: registered,
                },
            ]
        })
        .collect()
}

/// Groups by (year, category) and sums total usage.
pub fn breakdown<K, F>(records: &[DerivedRecord], key: F) -> Vec<BreakdownRow<K>>
where
    K: Ord + Copy,
    F: Fn(&DerivedRecord) -> K,
{
    let mut groups: BTreeMap<(i32, K), u64> = BTreeMap::new();

    for r in records {
        let total = groups.entry((r.record.year, key(r))).or_default();
        *total = total.saturating_add(r.record.total);
    }

    groups
        .into_iter()
        .map(|((year, category), total)| BreakdownRow {
            year,
            category,
            total,
        })
        .collect()
}

/// Counts records per dominance label.
pub fn dominance_counts(records: &[DerivedRecord]) -> Vec<DominanceRow> {
    let mut counts = BTreeMap::new();

    for r in records {
        *counts.entry(r.dominance).or_insert(0usize) += 1;
    }

    counts
        .into_iter()
        .map(|(dominance, records)| DominanceRow { dominance, records })
        .collect()
}
