//! Frequent-flyer ledger: points, tiers and the discount each tier earns.

use serde::{Deserialize, Serialize};

/// Points credited for a booking and debited again on cancellation.
pub const BOOKING_REWARD_POINTS: i32 = 100;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "ff_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    None,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    pub const fn for_points(points: i32) -> Self {
        if points >= 1800 {
            Self::Platinum
        } else if points >= 1200 {
            Self::Gold
        } else if points >= 600 {
            Self::Silver
        } else {
            Self::None
        }
    }

    /// Fraction of the fare taken off for this tier.
    pub const fn discount_rate(self) -> f64 {
        match self {
            Self::Platinum => 0.10,
            Self::Gold => 0.05,
            Self::Silver => 0.02,
            Self::None => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequentFlyer {
    pub status: Tier,
    pub points: i32,
}

impl FrequentFlyer {
    pub const fn with_points(points: i32) -> Self {
        let points = if points < 0 { 0 } else { points };
        Self {
            status: Tier::for_points(points),
            points,
        }
    }

    /// Applies a point delta, floored at zero, and recomputes the tier.
    pub fn adjust(&mut self, delta: i32) {
        *self = Self::with_points(self.points.saturating_add(delta));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds() {
        assert_eq!(Tier::for_points(0), Tier::None);
        assert_eq!(Tier::for_points(599), Tier::None);
        assert_eq!(Tier::for_points(600), Tier::Silver);
        assert_eq!(Tier::for_points(1199), Tier::Silver);
        assert_eq!(Tier::for_points(1200), Tier::Gold);
        assert_eq!(Tier::for_points(1799), Tier::Gold);
        assert_eq!(Tier::for_points(1800), Tier::Platinum);
        assert_eq!(Tier::for_points(50_000), Tier::Platinum);
    }

    #[test]
    fn tier_is_monotonic_in_points() {
        let mut previous = Tier::for_points(0);
        for points in (0..2500).step_by(25) {
            let tier = Tier::for_points(points);
            assert!(tier >= previous, "tier dropped at {points}");
            previous = tier;
        }
    }

    #[test]
    fn adjust_recomputes_status_and_floors_at_zero() {
        let mut ff = FrequentFlyer::with_points(550);
        ff.adjust(BOOKING_REWARD_POINTS);
        assert_eq!(ff, FrequentFlyer { status: Tier::Silver, points: 650 });

        ff.adjust(-BOOKING_REWARD_POINTS);
        assert_eq!(ff, FrequentFlyer { status: Tier::None, points: 550 });

        let mut empty = FrequentFlyer::default();
        empty.adjust(-BOOKING_REWARD_POINTS);
        assert_eq!(empty.points, 0);
        assert_eq!(empty.status, Tier::None);
    }

    #[test]
    fn discount_rates_per_tier() {
        assert_eq!(Tier::Platinum.discount_rate(), 0.10);
        assert_eq!(Tier::Gold.discount_rate(), 0.05);
        assert_eq!(Tier::Silver.discount_rate(), 0.02);
        assert_eq!(Tier::None.discount_rate(), 0.0);
    }
}
