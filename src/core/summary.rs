use crate::core::transaction::{BankTransaction, SystemTransaction};
use crate::matching::key::MatchKey;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// One system record paired with one bank record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub system_id: String,
    pub bank_id: String,
    pub bank_name: String,
    pub key: MatchKey,
    /// `| |system amount| - |bank amount| |` at match time.
    pub discrepancy: Decimal,
}

/// Outcome of one reconciliation run.
///
/// Every input record ends up in exactly one place: either it contributed
/// to a [`MatchedPair`], or it is listed as unmatched. Unmatched bank
/// records are grouped by the statement they came from, and a bank only
/// appears in that map if it has at least one unmatched record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    total_system_transactions: usize,
    total_bank_transactions: usize,
    matched_pairs: Vec<MatchedPair>,
    /// In input order.
    unmatched_system_transactions: Vec<SystemTransaction>,
    /// bank name -> unmatched records, each list in input order.
    unmatched_bank_transactions: BTreeMap<String, Vec<BankTransaction>>,
    amount_discrepancy_total: Decimal,
    /// Set by the caller; the engine itself does not time anything.
    processing_duration: Duration,
}

impl ReconciliationSummary {
    /// Start an empty summary sized from the raw input lengths.
    pub fn new(total_system_transactions: usize, total_bank_transactions: usize) -> Self {
        Self {
            total_system_transactions,
            total_bank_transactions,
            ..Self::default()
        }
    }

    pub(crate) fn record_match(&mut self, pair: MatchedPair) {
        self.amount_discrepancy_total += pair.discrepancy;
        self.matched_pairs.push(pair);
    }

    pub(crate) fn push_unmatched_system(&mut self, tx: SystemTransaction) {
        self.unmatched_system_transactions.push(tx);
    }

    pub(crate) fn push_unmatched_bank(&mut self, tx: BankTransaction) {
        self.unmatched_bank_transactions
            .entry(tx.bank_name().to_string())
            .or_default()
            .push(tx);
    }

    pub fn set_processing_duration(&mut self, duration: Duration) {
        self.processing_duration = duration;
    }

    // --- Accessors ---

    pub fn total_system_transactions(&self) -> usize {
        self.total_system_transactions
    }

    pub fn total_bank_transactions(&self) -> usize {
        self.total_bank_transactions
    }

    /// Number of pairs; equal to both the system and the bank records consumed.
    pub fn matched_transactions(&self) -> usize {
        self.matched_pairs.len()
    }

    pub fn matched_pairs(&self) -> &[MatchedPair] {
        &self.matched_pairs
    }

    pub fn unmatched_system_transactions(&self) -> &[SystemTransaction] {
        &self.unmatched_system_transactions
    }

    pub fn unmatched_bank_transactions(&self) -> &BTreeMap<String, Vec<BankTransaction>> {
        &self.unmatched_bank_transactions
    }

    pub fn amount_discrepancy_total(&self) -> Decimal {
        self.amount_discrepancy_total
    }

    pub fn processing_duration(&self) -> Duration {
        self.processing_duration
    }

    pub fn unmatched_system_count(&self) -> usize {
        self.unmatched_system_transactions.len()
    }

    pub fn unmatched_bank_count(&self) -> usize {
        self.unmatched_bank_transactions.values().map(Vec::len).sum()
    }

    /// True when nothing was left over on either side.
    pub fn is_fully_reconciled(&self) -> bool {
        self.unmatched_system_transactions.is_empty() && self.unmatched_bank_transactions.is_empty()
    }

    /// `2 * matched + unmatched system + unmatched bank == total inputs`.
    pub fn accounts_for_all_inputs(&self) -> bool {
        self.matched_transactions() * 2 + self.unmatched_system_count() + self.unmatched_bank_count()
            == self.total_system_transactions + self.total_bank_transactions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::TransactionType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    #[test]
    fn test_empty_summary() {
        let summary = ReconciliationSummary::new(0, 0);
        assert_eq!(summary.matched_transactions(), 0);
        assert_eq!(summary.amount_discrepancy_total(), Decimal::ZERO);
        assert!(summary.is_fully_reconciled());
        assert!(summary.accounts_for_all_inputs());
    }

    #[test]
    fn test_discrepancy_accumulates() {
        let mut summary = ReconciliationSummary::new(2, 2);
        for (i, diff) in [dec!(0.10), dec!(0.25)].into_iter().enumerate() {
            summary.record_match(MatchedPair {
                system_id: format!("S{}", i),
                bank_id: format!("B{}", i),
                bank_name: "bank_a.csv".to_string(),
                key: MatchKey::new(date(), TransactionType::Credit),
                discrepancy: diff,
            });
        }
        assert_eq!(summary.matched_transactions(), 2);
        assert_eq!(summary.amount_discrepancy_total(), dec!(0.35));
        assert!(summary.accounts_for_all_inputs());
    }

    #[test]
    fn test_unmatched_bank_grouped_by_name() {
        let mut summary = ReconciliationSummary::new(0, 3);
        summary.push_unmatched_bank(BankTransaction::new("B1", dec!(1), date(), "b.csv"));
        summary.push_unmatched_bank(BankTransaction::new("B2", dec!(2), date(), "a.csv"));
        summary.push_unmatched_bank(BankTransaction::new("B3", dec!(3), date(), "b.csv"));

        let banks: Vec<&String> = summary.unmatched_bank_transactions().keys().collect();
        assert_eq!(banks, vec!["a.csv", "b.csv"]);
        let ids: Vec<&str> = summary.unmatched_bank_transactions()["b.csv"]
            .iter()
            .map(|tx| tx.id())
            .collect();
        assert_eq!(ids, vec!["B1", "B3"]);
        assert_eq!(summary.unmatched_bank_count(), 3);
        assert!(!summary.is_fully_reconciled());
    }
}
