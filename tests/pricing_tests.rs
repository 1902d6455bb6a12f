use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use splitpay::domain::money::Money;
use splitpay::domain::pricing::{Coupon, PricingInput};

#[test]
fn test_split_checkout_with_fee() {
    // 999 split three ways, 5% fee, no coupon, empty wallet.
    let input = PricingInput {
        base_amount: Money::from_minor(999),
        share_count: 3,
        fee_percent: dec!(0.05),
        coupon: None,
        wallet_unlocked: Money::ZERO,
    };
    let b = input.breakdown(Utc::now());
    assert_eq!(
        (
            b.per_share_amount,
            b.fee_amount,
            b.discount_amount,
            b.wallet_deduction,
            b.net_payable,
        ),
        (
            Money::from_minor(333),
            Money::from_minor(17),
            Money::ZERO,
            Money::ZERO,
            Money::from_minor(350),
        )
    );
}

#[test]
fn test_capped_coupon_with_partial_wallet() {
    // 20% of 1000 caps at 100; wallet covers 50 of the 950 gross.
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
    let b = input.breakdown(Utc::now());
    assert_eq!(b.fee_amount, Money::from_minor(50));
    assert_eq!(b.discount_amount, Money::from_minor(100));
    assert_eq!(b.wallet_deduction, Money::from_minor(50));
    assert_eq!(b.net_payable, Money::from_minor(900));
}

#[test]
fn test_randomized_breakdowns_hold_invariants() {
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    for _ in 0..1_000 {
        let wallet = Money::from_minor(rng.gen_range(0..2_000_000u64));
        let coupon = rng.gen_bool(0.5).then(|| Coupon {
            code: "RND".into(),
            discount_percentage: Decimal::from(rng.gen_range(0..=100u32)),
            max_amount: Money::from_minor(rng.gen_range(0..100_000u64)),
            expires_at: None,
        });
        let input = PricingInput {
            base_amount: Money::from_minor(rng.gen_range(0..5_000_000u64)),
            share_count: rng.gen_range(0..12u32),
            // Up to a 10% fee, in hundredths of a basis point.
            fee_percent: Decimal::new(rng.gen_range(0..1_000i64), 4),
            coupon: coupon.clone(),
            wallet_unlocked: wallet,
        };
        let b = input.breakdown(now);

        assert!(b.net_payable >= Money::ZERO);
        if let Some(coupon) = &coupon {
            assert!(b.discount_amount <= coupon.max_amount);
            assert!(
                b.discount_amount
                    <= b.per_share_amount
                        .percent_ceil(coupon.discount_percentage / Decimal::ONE_HUNDRED)
            );
        }

        let gross = (b.per_share_amount + b.fee_amount).saturating_sub(b.discount_amount);
        assert!(b.wallet_deduction <= gross);
        assert!(b.wallet_deduction <= wallet);
        assert_eq!(b.net_payable, gross.saturating_sub(b.wallet_deduction));

        // Pure function: identical inputs, identical output.
        assert_eq!(b, input.breakdown(now));
    }
}
