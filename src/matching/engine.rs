use crate::core::summary::{MatchedPair, ReconciliationSummary};
use crate::core::transaction::{BankTransaction, SystemTransaction};
use crate::matching::grouping::BucketIndex;
use log::{debug, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Tunables for the matching pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// A pair is only accepted when its discrepancy is strictly below this value.
    pub discrepancy_threshold: Decimal,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            discrepancy_threshold: dec!(1000),
        }
    }
}

/// The reconciliation engine.
///
/// Pairs ledger records with bank statement records that share a
/// [`MatchKey`](crate::matching::key::MatchKey) (calendar day and
/// direction), choosing for each ledger record the closest unused bank
/// record in its bucket. Ledger records without a key stay unmatched.
///
/// # Algorithm
///
/// 1. Bucket both sides by key, preserving input order inside each bucket.
/// 2. For each system bucket, in first-seen order, visit its records in
///    input order. Each one scans the bucket's unused bank records and takes
///    the one with the smallest `| |system| - |bank| |`, provided that
///    difference is strictly below the threshold. Ties go to the earlier
///    bank record.
/// 3. A taken bank record is never offered again.
/// 4. Everything not taken is reported unmatched, in input order.
///
/// The pass is greedy: an early ledger record can take a candidate that
/// would have suited a later one better. This ordering is part of the
/// contract and must not be "optimised" away.
///
/// # Examples
///
/// ```
/// use bank_reconciler::core::transaction::{BankTransaction, SystemTransaction, TransactionType};
/// use bank_reconciler::matching::engine::ReconciliationEngine;
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use rust_decimal_macros::dec;
///
/// let system = vec![SystemTransaction::new(
///     "S1",
///     dec!(150.25),
///     TransactionType::Debit,
///     Utc.with_ymd_and_hms(2023, 1, 1, 9, 0, 0).unwrap(),
/// )];
/// let bank = vec![BankTransaction::new(
///     "B1",
///     dec!(-150.00),
///     NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
///     "bank_a.csv",
/// )];
///
/// let summary = ReconciliationEngine::new().reconcile(&system, &bank);
/// assert_eq!(summary.matched_transactions(), 1);
/// assert_eq!(summary.amount_discrepancy_total(), dec!(0.25));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    config: ReconcileConfig,
}

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Reconcile a ledger against a merged set of bank statements.
    ///
    /// Total over any input, including empty slices. The inputs are only
    /// read; unmatched records are cloned into the summary.
    pub fn reconcile(
        &self,
        system_txs: &[SystemTransaction],
        bank_txs: &[BankTransaction],
    ) -> ReconciliationSummary {
        let mut system_index = BucketIndex::new();
        for (position, tx) in system_txs.iter().enumerate() {
            match tx.match_key() {
                Some(key) => system_index.insert(key, position),
                None => debug!("{} has type '{}' and no match key", tx.id(), tx.label()),
            }
        }
        let bank_index = BucketIndex::build(bank_txs.iter().map(BankTransaction::match_key));
        debug!(
            "bucketed into {} system / {} bank keys",
            system_index.bucket_count(),
            bank_index.bucket_count()
        );

        let mut summary = ReconciliationSummary::new(system_txs.len(), bank_txs.len());
        let mut system_used = vec![false; system_txs.len()];
        let mut bank_used = vec![false; bank_txs.len()];

        for (key, system_bucket) in system_index.iter() {
            let Some(bank_bucket) = bank_index.get(key) else {
                debug!("no bank candidates for {} ({} system records)", key, system_bucket.len());
                continue;
            };

            for &si in system_bucket {
                let system_tx = &system_txs[si];
                let Some((bi, discrepancy)) =
                    self.best_candidate(system_tx, bank_bucket, bank_txs, &bank_used)
                else {
                    continue;
                };

                system_used[si] = true;
                bank_used[bi] = true;
                let bank_tx = &bank_txs[bi];
                debug!(
                    "matched {} <-> {}/{} on {} (discrepancy {})",
                    system_tx.id(),
                    bank_tx.bank_name(),
                    bank_tx.id(),
                    key,
                    discrepancy
                );
                summary.record_match(MatchedPair {
                    system_id: system_tx.id().to_string(),
                    bank_id: bank_tx.id().to_string(),
                    bank_name: bank_tx.bank_name().to_string(),
                    key: *key,
                    discrepancy,
                });
            }
        }

        for (tx, _) in system_txs.iter().zip(&system_used).filter(|(_, used)| !**used) {
            summary.push_unmatched_system(tx.clone());
        }
        for (tx, _) in bank_txs.iter().zip(&bank_used).filter(|(_, used)| !**used) {
            summary.push_unmatched_bank(tx.clone());
        }

        info!(
            "reconciled {} system / {} bank records: {} matched, {} system unmatched, {} bank unmatched, discrepancy {}",
            summary.total_system_transactions(),
            summary.total_bank_transactions(),
            summary.matched_transactions(),
            summary.unmatched_system_count(),
            summary.unmatched_bank_count(),
            summary.amount_discrepancy_total()
        );

        summary
    }

    /// Closest unused bank record in `bucket`, if any is strictly under the threshold.
    ///
    /// The running best starts at the threshold itself, and only a strictly
    /// smaller difference replaces it, so the first of several equal
    /// candidates wins.
    fn best_candidate(
        &self,
        system_tx: &SystemTransaction,
        bucket: &[usize],
        bank_txs: &[BankTransaction],
        bank_used: &[bool],
    ) -> Option<(usize, Decimal)> {
        let target = system_tx.amount().abs();
        let mut best: Option<usize> = None;
        let mut best_difference = self.config.discrepancy_threshold;

        for &bi in bucket {
            if bank_used[bi] {
                continue;
            }
            let difference = (target - bank_txs[bi].magnitude()).abs();
            if difference < best_difference {
                best_difference = difference;
                best = Some(bi);
            }
        }

        best.map(|bi| (bi, best_difference))
    }
}
