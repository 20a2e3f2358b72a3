use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::Money;

/// One contiguous amount range with its own fee rate and optional cap.
/// An amount matches the tier when `lower_exclusive < amount` and either the
/// tier is unbounded or `amount <= upper_inclusive`.
#[derive(Debug, Clone)]
pub struct FeeTier {
    pub lower_exclusive: Decimal,
    pub upper_inclusive: Option<Decimal>,
    pub rate: Decimal,
    pub cap: Option<Money>,
}

/// Ordered table of fee tiers. Tiers partition the positive amount space into
/// contiguous, non-overlapping ranges, so exactly one tier matches any valid
/// amount. Pure and side-effect free; safe to share across requests.
#[derive(Debug, Clone)]
pub struct FeeSchedule {
    tiers: Vec<FeeTier>,
}

impl FeeSchedule {
    pub fn new(tiers: Vec<FeeTier>) -> Self {
        Self { tiers }
    }

    /// Compute the fee for a positive transfer amount: the matching tier's
    /// rate applied to the amount, rounded half-up to the cent, then clamped
    /// to the tier's cap. A schedule whose last tier is unbounded always
    /// matches; a miss on a custom schedule falls through to 0.00.
    pub fn compute_fee(&self, amount: Money) -> Money {
        for tier in &self.tiers {
            let above_lower = amount.amount() > tier.lower_exclusive;
            let within_upper = tier
                .upper_inclusive
                .is_none_or(|upper| amount.amount() <= upper);

            if above_lower && within_upper {
                let fee = Money::new(amount.amount() * tier.rate);
                return match tier.cap {
                    Some(cap) if fee > cap => cap,
                    _ => fee,
                };
            }
        }
        Money::zero()
    }
}

impl Default for FeeSchedule {
    /// The standard six-tier schedule: a free tier up to 2000.00, then
    /// decreasing percentage rates with per-tier caps.
    fn default() -> Self {
        Self::new(vec![
            FeeTier {
                lower_exclusive: dec!(0.00),
                upper_inclusive: Some(dec!(2000.00)),
                rate: dec!(0.00),
                cap: None,
            },
            FeeTier {
                lower_exclusive: dec!(2000.00),
                upper_inclusive: Some(dec!(10000.00)),
                rate: dec!(0.0025),
                cap: Some(Money::new(dec!(20.00))),
            },
            FeeTier {
                lower_exclusive: dec!(10000.00),
                upper_inclusive: Some(dec!(20000.00)),
                rate: dec!(0.0020),
                cap: Some(Money::new(dec!(25.00))),
            },
            FeeTier {
                lower_exclusive: dec!(20000.00),
                upper_inclusive: Some(dec!(50000.00)),
                rate: dec!(0.00125),
                cap: Some(Money::new(dec!(40.00))),
            },
            FeeTier {
                lower_exclusive: dec!(50000.00),
                upper_inclusive: Some(dec!(100000.00)),
                rate: dec!(0.0008),
                cap: Some(Money::new(dec!(50.00))),
            },
            FeeTier {
                lower_exclusive: dec!(100000.00),
                upper_inclusive: None,
                rate: dec!(0.0005),
                cap: Some(Money::new(dec!(100.00))),
            },
        ])
    }
}
