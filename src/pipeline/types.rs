//! Row types of the aggregation views and the summary built from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::features::{DayType, TimeBucket, UserDominance};
use crate::pipeline::filter::FilterSelection;
use crate::pipeline::tier::RentalTier;
use crate::record::{Season, Weather};

/// User group used as a categorical axis in the long-form user-type view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Casual,
    Registered,
}

impl UserType {
    pub fn label(self) -> &'static str {
        match self {
            UserType::Casual => "casual",
            UserType::Registered => "registered",
        }
    }
}

/// One calendar day. `year` is taken from the first record of the day, or
/// from the date itself on a zero-filled day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub year: i32,
    pub casual: u64,
    pub registered: u64,
    pub total: u64,
    pub tier: RentalTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRow {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayRow {
    pub year: i32,
    pub weekday: u8,
    pub weekday_name: &'static str,
    pub total: u64,
}

/// Long-form row: one per (year, user type).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserTypeRow {
    pub year: i32,
    pub user_type: UserType,
    pub rentals: u64,
}

/// Total usage for one (year, category) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow<K> {
    pub year: i32,
    pub category: K,
    pub total: u64,
}

/// Number of hourly records carrying a dominance label (a count, not a volume).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DominanceRow {
    pub dominance: UserDominance,
    pub records: usize,
}

/// Number of days in each rental tier, per year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierCountRow {
    pub year: i32,
    pub tier: RentalTier,
    pub days: usize,
}

/// Every aggregation view computed for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Views {
    pub daily: Vec<DailyRow>,
    pub tier_counts: Vec<TierCountRow>,
    pub monthly: Vec<MonthlyRow>,
    pub weekday: Vec<WeekdayRow>,
    pub user_type: Vec<UserTypeRow>,
    pub day_type: Vec<BreakdownRow<DayType>>,
    pub season: Vec<BreakdownRow<Season>>,
    pub weather: Vec<BreakdownRow<Weather>>,
    pub time_bucket: Vec<BreakdownRow<TimeBucket>>,
    pub dominance: Vec<DominanceRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub total: u64,
    pub casual: u64,
    pub registered: u64,
}

/// Most frequent daily tier and the mean daily total within it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierHighlight {
    pub tier: RentalTier,
    pub days: usize,
    pub mean_daily_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeHighlight {
    pub bucket: TimeBucket,
    pub clock_range: &'static str,
    pub total: u64,
}

/// Winning user group over the range.
///
/// `average` is half the winning total. It is a display figure, not a
/// per-period mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MajorityUser {
    pub user_type: UserType,
    pub total: u64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentMeans {
    pub temp: f64,
    pub atemp: f64,
    pub humidity: f64,
    pub windspeed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub totals: Totals,
    pub tier: TierHighlight,
    pub popular_time: TimeHighlight,
    pub majority_user: MajorityUser,
    pub environment: EnvironmentMeans,
}

/// Complete result of one query, handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub selection: FilterSelection,
    pub matched_records: usize,
    pub rejected_records: usize,
    pub views: Views,
    pub summary: Summary,
}
