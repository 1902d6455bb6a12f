use crate::domain::pricing::PriceBreakdown;
use crate::error::Result;
use std::io::Write;

/// Writes computed price breakdowns as CSV.
pub struct BreakdownWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BreakdownWriter<W> {
    pub fn new(target: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().from_writer(target),
        }
    }

    pub fn write_breakdowns(
        &mut self,
        breakdowns: impl IntoIterator<Item = (String, PriceBreakdown)>,
    ) -> Result<()> {
        self.writer.write_record([
            "subject",
            "base",
            "per_share",
            "fee",
            "discount",
            "wallet_deduction",
            "net_payable",
        ])?;
        for (subject, b) in breakdowns {
            self.writer.write_record([
                subject,
                b.base_amount.to_string(),
                b.per_share_amount.to_string(),
                b.fee_amount.to_string(),
                b.discount_amount.to_string(),
                b.wallet_deduction.to_string(),
                b.net_payable.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
