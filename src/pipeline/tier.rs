use serde::{Deserialize, Serialize};

/// Rental-volume band for a daily total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RentalTier {
    Low,
    Medium,
    High,
}

impl RentalTier {
    pub const ALL: [RentalTier; 3] = [RentalTier::Low, RentalTier::Medium, RentalTier::High];

    pub fn label(self) -> &'static str {
        match self {
            RentalTier::Low => "Low",
            RentalTier::Medium => "Medium",
            RentalTier::High => "High",
        }
    }
}

/// Converts an aggregated daily total into a [`RentalTier`].
///
/// | Range          | Tier   |
/// |----------------|--------|
/// | < 1000         | Low    |
/// | 1000 ..= 5000  | Medium |
/// | > 5000         | High   |
pub fn tier(daily_total: u64) -> RentalTier {
    match daily_total {
        t if t < 1000 => RentalTier::Low,
        t if t <= 5000 => RentalTier::Medium,
        _ => RentalTier::High,
    }
}
