use crate::domain::money::Money;
use crate::domain::pricing::{Coupon, PricingInput};
use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One row of a quote input file.
///
/// The coupon columns are optional as a group: a row carries either all
/// three or none. `kind` is informational in quote files; pricing does not
/// depend on it.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct QuoteRow {
    pub kind: String,
    pub subject: String,
    pub base_amount: u64,
    pub share_count: u32,
    pub fee_percent: Decimal,
    pub coupon_code: Option<String>,
    pub coupon_percent: Option<Decimal>,
    pub coupon_max: Option<u64>,
    pub wallet_unlocked: u64,
}

impl QuoteRow {
    pub fn pricing_input(&self) -> PricingInput {
        let coupon = match (&self.coupon_code, self.coupon_percent, self.coupon_max) {
            (Some(code), Some(percent), Some(max)) => Some(Coupon {
                code: code.clone(),
                discount_percentage: percent,
                max_amount: Money::from_minor(max),
                expires_at: None,
            }),
            _ => None,
        };
        PricingInput {
            base_amount: Money::from_minor(self.base_amount),
            share_count: self.share_count,
            fee_percent: self.fee_percent,
            coupon,
            wallet_unlocked: Money::from_minor(self.wallet_unlocked),
        }
    }
}

/// Reads quote rows from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<QuoteRow>`,
/// trimming whitespace and tolerating short rows so hand-written files work.
pub struct QuoteReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> QuoteReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads and deserializes rows, streaming large files.
    pub fn rows(self) -> impl Iterator<Item = Result<QuoteRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }
}
