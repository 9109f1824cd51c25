//! Headline metrics derived from the aggregation views.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::features::{DerivedRecord, TimeBucket};
use crate::pipeline::tier::RentalTier;
use crate::pipeline::types::{
    BreakdownRow, DailyRow, EnvironmentMeans, MajorityUser, Summary, TierHighlight, TimeHighlight,
    Totals, UserType, UserTypeRow, Views,
};
use crate::pipeline::utility::mean;

/// Builds the [`Summary`] for a selection.
///
/// `records` is the filtered (not aggregated) record set, used for the
/// environmental means.
///
/// # Errors
///
/// [`PipelineError::EmptyResult`] if the selection matched nothing.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn summarize(views: &Views, records: &[DerivedRecord]) -> PipelineResult<Summary> {
    if records.is_empty() {
        return Err(PipelineError::EmptyResult);
    }

    let summary = Summary {
        totals: totals(&views.daily),
        tier: modal_tier(&views.daily).ok_or(PipelineError::EmptyResult)?,
        popular_time: popular_time(&views.time_bucket).ok_or(PipelineError::EmptyResult)?,
        majority_user: majority_user(&views.user_type),
        environment: environment_means(records).ok_or(PipelineError::EmptyResult)?,
    };

    debug!(
        total = summary.totals.total,
        tier = summary.tier.tier.label(),
        popular_time = summary.popular_time.bucket.label(),
        "Summarized selection"
    );
    Ok(summary)
}

pub fn totals(daily: &[DailyRow]) -> Totals {
    daily.iter().fold(
        Totals {
            total: 0,
            casual: 0,
            registered: 0,
        },
        |acc, d| Totals {
            total: acc.total.saturating_add(d.total),
            casual: acc.casual.saturating_add(d.casual),
            registered: acc.registered.saturating_add(d.registered),
        },
    )
}

/// Most frequent tier across days; ties go to the lower tier.
pub fn modal_tier(daily: &[DailyRow]) -> Option<TierHighlight> {
    let mut counts: BTreeMap<RentalTier, usize> = BTreeMap::new();
    for d in daily {
        *counts.entry(d.tier).or_default() += 1;
    }

    let mut best: Option<(RentalTier, usize)> = None;
    for (tier, days) in counts {
        if best.is_none_or(|(_, n)| days > n) {
            best = Some((tier, days));
        }
    }

    let (tier, days) = best?;
    let mean_daily_total = mean(
        daily
            .iter()
            .filter(|d| d.tier == tier)
            .map(|d| d.total as f64),
    )?;

    Some(TierHighlight {
        tier,
        days,
        mean_daily_total,
    })
}

/// Bucket with the largest usage summed over all years; ties go to the
/// earlier bucket of the day (clock order, not label order).
pub fn popular_time(rows: &[BreakdownRow<TimeBucket>]) -> Option<TimeHighlight> {
    let mut sums: BTreeMap<TimeBucket, u64> = BTreeMap::new();
    for row in rows {
        let sum = sums.entry(row.category).or_default();
        *sum = sum.saturating_add(row.total);
    }

    let mut best: Option<(TimeBucket, u64)> = None;
    for (bucket, total) in sums {
        if best.is_none_or(|(_, t)| total > t) {
            best = Some((bucket, total));
        }
    }

    best.map(|(bucket, total)| TimeHighlight {
        bucket,
        clock_range: bucket.clock_range(),
        total,
    })
}

/// Casual against registered over the whole range; ties go to registered.
pub fn majority_user(rows: &[UserTypeRow]) -> MajorityUser {
    let sum_of = |user_type: UserType| -> u64 {
        rows.iter()
            .filter(|r| r.user_type == user_type)
            .fold(0u64, |acc, r| acc.saturating_add(r.rentals))
    };
    let casual = sum_of(UserType::Casual);
    let registered = sum_of(UserType::Registered);

    let (user_type, total) = if casual > registered {
        (UserType::Casual, casual)
    } else {
        (UserType::Registered, registered)
    };

    MajorityUser {
        user_type,
        total,
        average: total as f64 / 2.0,
    }
}

pub fn environment_means(records: &[DerivedRecord]) -> Option<EnvironmentMeans> {
    Some(EnvironmentMeans {
        temp: mean(records.iter().map(|r| r.record.temp))?,
        atemp: mean(records.iter().map(|r| r.record.atemp))?,
        humidity: mean(records.iter().map(|r| r.record.humidity))?,
        windspeed: mean(records.iter().map(|r| r.record.windspeed))?,
    })
}
