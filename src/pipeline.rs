//! End-to-end use case: load both sides, then reconcile.

use crate::core::summary::ReconciliationSummary;
use crate::core::transaction::{BankTransaction, SystemTransaction};
use crate::ingest::csv_reader::CsvLedgerReader;
use crate::ingest::error::LoadError;
use crate::ingest::range::DateRange;
use crate::matching::engine::ReconciliationEngine;
use log::info;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Supplies the internal ledger.
pub trait SystemLedgerSource: Sync {
    fn load_system_transactions(
        &self,
        path: &Path,
        range: &DateRange,
    ) -> Result<Vec<SystemTransaction>, LoadError>;
}

/// Supplies the merged bank statements.
pub trait BankStatementSource: Sync {
    fn load_bank_transactions(
        &self,
        paths: &[PathBuf],
        range: &DateRange,
    ) -> Result<Vec<BankTransaction>, LoadError>;
}

impl SystemLedgerSource for CsvLedgerReader {
    fn load_system_transactions(
        &self,
        path: &Path,
        range: &DateRange,
    ) -> Result<Vec<SystemTransaction>, LoadError> {
        self.read_system_transactions(path, range)
    }
}

impl BankStatementSource for CsvLedgerReader {
    fn load_bank_transactions(
        &self,
        paths: &[PathBuf],
        range: &DateRange,
    ) -> Result<Vec<BankTransaction>, LoadError> {
        self.read_bank_statements(paths, range)
    }
}

/// Failure of a reconciliation run. The engine itself cannot fail, so
/// every variant is a loading problem on one side.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("failed to read system transactions")]
    SystemLoad(#[source] LoadError),
    #[error("failed to read bank statements")]
    BankLoad(#[source] LoadError),
}

impl ReconcileError {
    /// The message followed by every cause in the source chain, `: `-joined.
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut cause = StdError::source(self);
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        message
    }
}

/// Inputs for one run.
#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    pub system_file: PathBuf,
    pub bank_files: Vec<PathBuf>,
    pub range: DateRange,
}

/// Loads the ledger and the statements concurrently, then hands both to
/// the engine. Nothing is reconciled unless both loads succeed.
pub struct Reconciler<S, B> {
    system_source: S,
    bank_source: B,
    engine: ReconciliationEngine,
}

impl<S, B> Reconciler<S, B>
where
    S: SystemLedgerSource,
    B: BankStatementSource,
{
    pub fn new(system_source: S, bank_source: B, engine: ReconciliationEngine) -> Self {
        Self {
            system_source,
            bank_source,
            engine,
        }
    }

    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    pub fn run(&self, request: &ReconcileRequest) -> Result<ReconciliationSummary, ReconcileError> {
        info!(
            "loading '{}' and {} bank statement(s) for {}",
            request.system_file.display(),
            request.bank_files.len(),
            request.range
        );

        let (system_result, bank_result) = rayon::join(
            || {
                self.system_source
                    .load_system_transactions(&request.system_file, &request.range)
            },
            || {
                self.bank_source
                    .load_bank_transactions(&request.bank_files, &request.range)
            },
        );

        let system_txs = system_result.map_err(ReconcileError::SystemLoad)?;
        let bank_txs = bank_result.map_err(ReconcileError::BankLoad)?;

        Ok(self.engine.reconcile(&system_txs, &bank_txs))
    }
}

impl Reconciler<CsvLedgerReader, CsvLedgerReader> {
    /// CSV on both sides with the default engine.
    pub fn csv() -> Self {
        Self::new(CsvLedgerReader::new(), CsvLedgerReader::new(), ReconciliationEngine::new())
    }
}
