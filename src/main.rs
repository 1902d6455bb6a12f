use chrono::Utc;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use splitpay::interfaces::csv::breakdown_writer::BreakdownWriter;
use splitpay::interfaces::csv::quote_reader::QuoteReader;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Computes price breakdowns for a CSV of quote requests.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input quotes CSV file
    input: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = QuoteReader::new(file);
    let now = Utc::now();

    let mut breakdowns = Vec::new();
    for row in reader.rows() {
        match row {
            Ok(row) => {
                let breakdown = row.pricing_input().breakdown(now);
                breakdowns.push((row.subject, breakdown));
            }
            Err(e) => {
                eprintln!("Error reading quote: {e}");
            }
        }
    }

    let stdout = io::stdout();
    let mut writer = BreakdownWriter::new(stdout.lock());
    writer.write_breakdowns(breakdowns).into_diagnostic()?;

    Ok(())
}
