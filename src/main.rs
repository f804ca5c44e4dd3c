//! bank-reconciler CLI
//!
//! Reconcile an internal ledger against bank statements from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Reconcile January against two bank statements
//! bank-reconciler --sys system.csv --bank bca.csv,mandiri.csv \
//!     --start 2023-01-01 --end 2023-01-31
//!
//! # Tighter tolerance, JSON output
//! bank-reconciler --sys system.csv --bank bca.csv --start 2023-01-01 \
//!     --end 2023-01-31 --threshold 5 --format json
//! ```
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `info`).

use bank_reconciler::ingest::csv_reader::CsvLedgerReader;
use bank_reconciler::ingest::range::DateRange;
use bank_reconciler::matching::engine::{ReconcileConfig, ReconciliationEngine};
use bank_reconciler::pipeline::{ReconcileRequest, Reconciler};
use bank_reconciler::report::{ReportOutput, TextReport};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

/// Reconcile system transactions against bank statements
#[derive(Parser, Debug)]
#[command(name = "bank-reconciler")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the system transactions CSV
    #[arg(long = "sys", value_parser = parse_path)]
    system_file: PathBuf,

    /// Comma-separated paths to bank statement CSVs
    #[arg(
        long = "bank",
        value_delimiter = ',',
        num_args = 1..,
        required = true,
        value_parser = parse_path
    )]
    bank_files: Vec<PathBuf>,

    /// Start date for reconciliation (YYYY-MM-DD, inclusive)
    #[arg(long)]
    start: String,

    /// End date for reconciliation (YYYY-MM-DD, inclusive)
    #[arg(long)]
    end: String,

    /// Largest amount difference (exclusive) still accepted as a match
    #[arg(long, default_value = "1000", value_parser = parse_threshold)]
    threshold: Decimal,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn parse_date(label: &str, raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").unwrap_or_else(|e| {
        error!("Invalid {} date format '{}': {}. Please use YYYY-MM-DD.", label, raw, e);
        process::exit(1);
    })
}

fn parse_path(raw: &str) -> Result<PathBuf, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("path must not be empty".to_string());
    }
    Ok(PathBuf::from(trimmed))
}

/// Non-negative decimal. Zero is accepted but can never produce a match.
fn parse_threshold(raw: &str) -> Result<Decimal, String> {
    let threshold: Decimal = raw
        .trim()
        .parse()
        .map_err(|e| format!("'{}' is not a decimal: {}", raw, e))?;
    if threshold.is_sign_negative() && !threshold.is_zero() {
        return Err(format!("'{}' is negative; nothing could ever match", raw));
    }
    Ok(threshold)
}

fn main() {
    let process_start = Instant::now();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let range = DateRange::new(parse_date("start", &cli.start), parse_date("end", &cli.end));
    if range.is_empty() {
        warn!("start date {} is after end date {}; nothing will be loaded", range.start(), range.end());
    }

    if cli.threshold.is_zero() {
        warn!("discrepancy threshold is 0; no pair can be matched");
    }
    let engine = ReconciliationEngine::with_config(ReconcileConfig {
        discrepancy_threshold: cli.threshold,
    });
    let reconciler = Reconciler::new(CsvLedgerReader::new(), CsvLedgerReader::new(), engine);
    info!(
        "matching with discrepancy threshold {}",
        reconciler.engine().config().discrepancy_threshold
    );
    let request = ReconcileRequest {
        system_file: cli.system_file,
        bank_files: cli.bank_files,
        range,
    };

    info!("Starting reconciliation process...");
    let mut summary = reconciler.run(&request).unwrap_or_else(|e| {
        error!("Reconciliation failed: {}", e.chain());
        process::exit(1);
    });
    info!("Reconciliation process completed successfully.");
    summary.set_processing_duration(process_start.elapsed());

    match cli.format {
        Format::Text => println!("{}", TextReport(&summary)),
        Format::Json => match serde_json::to_string_pretty(&ReportOutput::from(&summary)) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Could not serialise report: {}", e);
                process::exit(1);
            }
        },
    }
}
