//! # bank-reconciler
//!
//! Reconciles an internal transaction ledger against one or more bank
//! statements.
//!
//! Records on both sides are bucketed by calendar day and direction, and
//! each ledger record is paired with the closest still-unused bank record
//! in its bucket, as long as the amounts differ by less than a configurable
//! threshold. The result lists what matched, what did not, and the total
//! amount discrepancy across matched pairs.
//!
//! ## Architecture
//!
//! - **core** — Transaction records and the reconciliation summary
//! - **matching** — Match keys, bucketing and the best-fit engine
//! - **ingest** — CSV loading with date-range filtering and parallel statement reads
//! - **pipeline** — Concurrent load-then-reconcile use case
//! - **report** — Text and JSON rendering of a summary
//! - **simulation** — Synthetic ledgers and statements for benchmarks and tests

pub mod core;
pub mod ingest;
pub mod matching;
pub mod pipeline;
pub mod report;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::summary::{MatchedPair, ReconciliationSummary};
    pub use crate::core::transaction::{BankTransaction, SystemTransaction, TransactionType};
    pub use crate::ingest::csv_reader::CsvLedgerReader;
    pub use crate::ingest::error::LoadError;
    pub use crate::ingest::range::DateRange;
    pub use crate::matching::engine::{ReconcileConfig, ReconciliationEngine};
    pub use crate::matching::key::MatchKey;
    pub use crate::pipeline::{ReconcileError, ReconcileRequest, Reconciler};
}
