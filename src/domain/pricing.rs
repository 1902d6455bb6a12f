use super::money::Money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minor units per major unit exponent (10^2 for paise/cents).
pub const CURRENCY_EXPONENT: u32 = 2;

/// A discount voucher. Owned by the backend; the client holds a read-only,
/// cache-invalidated copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    /// Whole percentage points, e.g. `20` for a 20% discount.
    pub discount_percentage: Decimal,
    pub max_amount: Money,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Coupon {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Effective discount against a per-share amount, capped at `max_amount`.
    /// An expired coupon grants nothing; it is never an error.
    fn discount_for(&self, per_share: Money, now: DateTime<Utc>) -> Money {
        if self.is_expired(now) {
            return Money::ZERO;
        }
        per_share
            .percent_ceil(self.discount_percentage / Decimal::ONE_HUNDRED)
            .min(self.max_amount)
    }
}

/// Inputs to a price quote, as collected from the current screen state.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingInput {
    pub base_amount: Money,
    /// Number of seats the cost is split across; `0` and `1` both mean the
    /// buyer carries the full amount.
    pub share_count: u32,
    /// Platform fee as a rate, e.g. `0.05`.
    pub fee_percent: Decimal,
    pub coupon: Option<Coupon>,
    pub wallet_unlocked: Money,
}

/// The settlement math shown next to the pay button.
///
/// Derived and never persisted: recomputed whenever inputs change, and it
/// must match the backend's authoritative computation step for step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub base_amount: Money,
    pub per_share_amount: Money,
    pub fee_amount: Money,
    pub discount_amount: Money,
    pub wallet_deduction: Money,
    pub net_payable: Money,
    pub currency_exponent: u32,
}

impl PricingInput {
    /// Computes the full breakdown. Pure: no I/O, no clock reads (the caller
    /// supplies `now` for coupon expiry), never panics. Safe to call on every
    /// keystroke.
    ///
    /// The steps apply in a fixed order because each later step consumes the
    /// already-rounded result of the previous one, and every rounding is a
    /// ceiling.
    pub fn breakdown(&self, now: DateTime<Utc>) -> PriceBreakdown {
        let per_share = if self.share_count >= 2 {
            self.base_amount.split_among(self.share_count)
        } else {
            self.base_amount
        };
        let fee = per_share.percent_ceil(self.fee_percent);
        let discount = self
            .coupon
            .as_ref()
            .map_or(Money::ZERO, |coupon| coupon.discount_for(per_share, now));
        let gross = (per_share + fee).saturating_sub(discount);
        let wallet_deduction = self.wallet_unlocked.min(gross);
        let net_payable = gross.saturating_sub(wallet_deduction);

        PriceBreakdown {
            base_amount: self.base_amount,
            per_share_amount: per_share,
            fee_amount: fee,
            discount_amount: discount,
            wallet_deduction,
            net_payable,
            currency_exponent: CURRENCY_EXPONENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_shared_subscription_breakdown() {
        // 999 split three ways with a 5% fee and no coupon.
        let input = PricingInput {
            base_amount: Money::from_minor(999),
            share_count: 3,
            fee_percent: dec!(0.05),
            coupon: None,
            wallet_unlocked: Money::ZERO,
        };
        let breakdown = input.breakdown(now());
        assert_eq!(breakdown.per_share_amount, Money::from_minor(333));
        assert_eq!(breakdown.fee_amount, Money::from_minor(17));
        assert_eq!(breakdown.discount_amount, Money::ZERO);
        assert_eq!(breakdown.net_payable, Money::from_minor(350));
    }

    #[test]
    fn test_coupon_cap_and_wallet_deduction() {
        // 20% of 1000 is 200, capped at 100; wallet covers 50 of the 950 gross.
        let input = PricingInput {
            base_amount: Money::from_minor(1000),
            share_count: 1,
            fee_percent: dec!(0.05),
            coupon: Some(Coupon {
                code: "SAVE20".into(),
                discount_percentage: dec!(20),
                max_amount: Money::from_minor(100),
                expires_at: None,
            }),
            wallet_unlocked: Money::from_minor(5000),
        };
        let breakdown = input.breakdown(now());
        assert_eq!(breakdown.per_share_amount, Money::from_minor(1000));
        assert_eq!(breakdown.fee_amount, Money::from_minor(50));
        assert_eq!(breakdown.discount_amount, Money::from_minor(100));
        assert_eq!(breakdown.wallet_deduction, Money::from_minor(950));
        assert_eq!(breakdown.net_payable, Money::ZERO);
    }

    #[test]
    fn test_wallet_deduction_capped_at_gross() {
        let input = PricingInput {
            base_amount: Money::from_minor(1000),
            share_count: 1,
            fee_percent: dec!(0.05),
            coupon: Some(Coupon {
                code: "SAVE20".into(),
                discount_percentage: dec!(20),
                max_amount: Money::from_minor(100),
                expires_at: None,
            }),
            wallet_unlocked: Money::from_minor(50),
        };
        let breakdown = input.breakdown(now());
        assert_eq!(breakdown.wallet_deduction, Money::from_minor(50));
        assert_eq!(breakdown.net_payable, Money::from_minor(900));
    }

    #[test]
    fn test_expired_coupon_grants_nothing() {
        let input = PricingInput {
            base_amount: Money::from_minor(1000),
            share_count: 1,
            fee_percent: dec!(0),
            coupon: Some(Coupon {
                code: "LATE".into(),
                discount_percentage: dec!(50),
                max_amount: Money::from_minor(1000),
                expires_at: Some(Utc::now() - Duration::hours(1)),
            }),
            wallet_unlocked: Money::ZERO,
        };
        let breakdown = input.breakdown(now());
        assert_eq!(breakdown.discount_amount, Money::ZERO);
        assert_eq!(breakdown.net_payable, Money::from_minor(1000));
    }

    #[test]
    fn test_discount_never_exceeds_gross() {
        // Oversized coupon: gross floors at zero rather than going negative.
        let input = PricingInput {
            base_amount: Money::from_minor(100),
            share_count: 1,
            fee_percent: dec!(0),
            coupon: Some(Coupon {
                code: "FREE".into(),
                discount_percentage: dec!(100),
                max_amount: Money::from_minor(10_000),
                expires_at: None,
            }),
            wallet_unlocked: Money::ZERO,
        };
        let breakdown = input.breakdown(now());
        assert_eq!(breakdown.net_payable, Money::ZERO);
    }

    #[test]
    fn test_zero_share_count_clamps() {
        let input = PricingInput {
            base_amount: Money::from_minor(500),
            share_count: 0,
            fee_percent: dec!(0),
            coupon: None,
            wallet_unlocked: Money::ZERO,
        };
        assert_eq!(input.breakdown(now()).per_share_amount, Money::from_minor(500));
    }

    #[test]
    fn test_breakdown_is_pure() {
        let input = PricingInput {
            base_amount: Money::from_minor(12_345),
            share_count: 7,
            fee_percent: dec!(0.035),
            coupon: None,
            wallet_unlocked: Money::from_minor(99),
        };
        let at = now();
        assert_eq!(input.breakdown(at), input.breakdown(at));
    }
}
