//! Delimited-text statement loading.
//!
//! ## Column contract
//!
//! | File      | Columns (header row is read and discarded)          |
//! |-----------|-----------------------------------------------------|
//! | ledger    | `id, amount, DEBIT/CREDIT, RFC-3339 timestamp`      |
//! | statement | `id, signed amount, YYYY-MM-DD date`                |
//!
//! Rows whose amount or date cannot be parsed, or that fall outside the
//! requested [`DateRange`], are dropped without error. Ledger type labels are
//! kept as read: an unknown label still yields a record, which then stays
//! unmatched. Structural problems (unopenable file, missing header, a row
//! with a different column count than the header) are returned as
//! [`LoadError`] and abort the load.

use crate::core::transaction::{BankTransaction, SystemTransaction};
use crate::ingest::error::LoadError;
use crate::ingest::range::DateRange;
use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, trace, warn};
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::io;
use std::path::{Path, PathBuf};

const SYSTEM_KIND: &str = "system transaction";
const BANK_KIND: &str = "bank statement";

/// Reads ledgers and bank statements from CSV files.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvLedgerReader;

impl CsvLedgerReader {
    pub fn new() -> Self {
        Self
    }

    /// Load the internal ledger at `path`, keeping rows inside `range`.
    pub fn read_system_transactions(
        &self,
        path: &Path,
        range: &DateRange,
    ) -> Result<Vec<SystemTransaction>, LoadError> {
        let reader = open(path, SYSTEM_KIND)?;
        let txs = parse_system_records(reader, path, range)?;
        debug!("loaded {} system transactions from '{}'", txs.len(), path.display());
        Ok(txs)
    }

    /// Same as [`read_system_transactions`](Self::read_system_transactions),
    /// from any reader. `source` is only used in error messages.
    pub fn read_system_transactions_from_reader<R: io::Read>(
        &self,
        rdr: R,
        source: &Path,
        range: &DateRange,
    ) -> Result<Vec<SystemTransaction>, LoadError> {
        parse_system_records(builder().from_reader(rdr), source, range)
    }

    /// Load one bank statement. The bank name is the file name of `path`.
    pub fn read_bank_statement(
        &self,
        path: &Path,
        range: &DateRange,
    ) -> Result<Vec<BankTransaction>, LoadError> {
        let reader = open(path, BANK_KIND)?;
        let txs = parse_bank_records(reader, path, &bank_name_for(path), range)?;
        debug!("loaded {} bank transactions from '{}'", txs.len(), path.display());
        Ok(txs)
    }

    pub fn read_bank_statement_from_reader<R: io::Read>(
        &self,
        rdr: R,
        source: &Path,
        bank_name: &str,
        range: &DateRange,
    ) -> Result<Vec<BankTransaction>, LoadError> {
        parse_bank_records(builder().from_reader(rdr), source, bank_name, range)
    }

    /// Load several statements in parallel, one task per file.
    ///
    /// Each task produces its own result; they are merged in the order of
    /// `paths` once every task has finished. If any file fails, the first
    /// failure (in path order) is returned and nothing else is kept.
    pub fn read_bank_statements(
        &self,
        paths: &[PathBuf],
        range: &DateRange,
    ) -> Result<Vec<BankTransaction>, LoadError> {
        let per_file: Vec<Result<Vec<BankTransaction>, LoadError>> = paths
            .par_iter()
            .map(|path| self.read_bank_statement(path, range))
            .collect();

        let mut merged = Vec::new();
        for result in per_file {
            merged.extend(result?);
        }
        Ok(merged)
    }
}

/// Name under which a statement's unmatched records are reported.
pub fn bank_name_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(false).trim(Trim::All);
    builder
}

fn open(path: &Path, kind: &'static str) -> Result<csv::Reader<std::fs::File>, LoadError> {
    builder().from_path(path).map_err(|source| LoadError::Open {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

/// Consume the header row, failing if there is none.
fn skip_header<R: io::Read>(
    records: &mut csv::StringRecordsIntoIter<R>,
    path: &Path,
) -> Result<(), LoadError> {
    match records.next() {
        None => Err(LoadError::MissingHeader {
            path: path.to_path_buf(),
        }),
        Some(Err(source)) => Err(LoadError::Header {
            path: path.to_path_buf(),
            source,
        }),
        Some(Ok(_)) => Ok(()),
    }
}

fn parse_system_records<R: io::Read>(
    reader: csv::Reader<R>,
    path: &Path,
    range: &DateRange,
) -> Result<Vec<SystemTransaction>, LoadError> {
    let mut records = reader.into_records();
    skip_header(&mut records, path)?;

    let mut txs = Vec::new();
    for record in records {
        let record = record.map_err(|source| LoadError::Record {
            path: path.to_path_buf(),
            source,
        })?;
        match parse_system_row(&record) {
            Some(tx) if range.contains_time(tx.transaction_time()) => {
                if tx.kind().is_none() {
                    warn!(
                        "row {} in '{}' has unknown type '{}'; it will stay unmatched",
                        line_of(&record),
                        path.display(),
                        tx.label()
                    );
                }
                txs.push(tx);
            }
            Some(_) => {}
            None => trace!("skipping malformed row {} in '{}'", line_of(&record), path.display()),
        }
    }
    Ok(txs)
}

fn parse_bank_records<R: io::Read>(
    reader: csv::Reader<R>,
    path: &Path,
    bank_name: &str,
    range: &DateRange,
) -> Result<Vec<BankTransaction>, LoadError> {
    let mut records = reader.into_records();
    skip_header(&mut records, path)?;

    let mut txs = Vec::new();
    for record in records {
        let record = record.map_err(|source| LoadError::Record {
            path: path.to_path_buf(),
            source,
        })?;
        match parse_bank_row(&record, bank_name) {
            Some(tx) if range.contains(tx.date()) => txs.push(tx),
            Some(_) => {}
            None => trace!("skipping malformed row {} in '{}'", line_of(&record), path.display()),
        }
    }
    Ok(txs)
}

fn parse_system_row(record: &StringRecord) -> Option<SystemTransaction> {
    let id = record.get(0)?;
    let amount = parse_amount(record.get(1)?)?;
    let label = record.get(2)?;
    let time = DateTime::parse_from_rfc3339(record.get(3)?).ok()?;
    Some(SystemTransaction::with_label(id, amount, label, time.with_timezone(&Utc)))
}

fn parse_bank_row(record: &StringRecord, bank_name: &str) -> Option<BankTransaction> {
    let id = record.get(0)?;
    let amount = parse_amount(record.get(1)?)?;
    let date = NaiveDate::parse_from_str(record.get(2)?, "%Y-%m-%d").ok()?;
    Some(BankTransaction::new(id, amount, date, bank_name))
}

/// Plain decimal notation, with scientific notation (`1.5e3`) as a fallback.
fn parse_amount(raw: &str) -> Option<Decimal> {
    raw.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}
