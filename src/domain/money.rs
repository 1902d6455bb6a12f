use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// A monetary value in whole minor currency units (paise, cents).
///
/// This is a wrapper around `rust_decimal::Decimal` so percentage math stays
/// exact, with the domain rule that every construction and operation rounds
/// *up* to a whole unit: the platform never under-collects a fee and never
/// over-grants a discount.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Builds a `Money` from an arbitrary decimal value.
    ///
    /// Negative values clamp to zero and fractional values round up; this is
    /// a display-path constructor and must never fail a render.
    pub fn new(value: Decimal) -> Self {
        if value <= Decimal::ZERO {
            Self::ZERO
        } else {
            Self(value.ceil())
        }
    }

    pub fn from_minor(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// The amount as whole minor units, for the wire contract.
    pub fn to_minor(&self) -> u64 {
        self.0.to_u64().unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Ceiling division: the per-seat cost of a shared subscription slot.
    /// A zero share count clamps to one.
    pub fn split_among(self, shares: u32) -> Self {
        let shares = shares.max(1);
        Self((self.0 / Decimal::from(shares)).ceil())
    }

    /// Ceiling of `self × rate`. Negative rates count as zero.
    pub fn percent_ceil(self, rate: Decimal) -> Self {
        if rate <= Decimal::ZERO {
            return Self::ZERO;
        }
        Self((self.0 * rate).ceil())
    }

    /// Subtraction that floors at zero instead of going negative.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        if rhs.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - rhs.0)
        }
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user's wallet as last fetched from the backend.
///
/// Read-only on the client: screens share the cached copy and only the cache
/// invalidator marks it stale after a settlement. Only `unlocked` is eligible
/// for automatic deduction against a purchase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub locked: Money,
    pub unlocked: Money,
}
