//! Human- and machine-readable renderings of a [`ReconciliationSummary`].

use crate::core::summary::ReconciliationSummary;
use crate::core::transaction::{BankTransaction, SystemTransaction};
use chrono::SecondsFormat;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

/// Fixed two-decimal rendering, half away from zero.
pub fn fixed2(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Plain-text report, written with `{}`.
pub struct TextReport<'a>(pub &'a ReconciliationSummary);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        writeln!(f, "\n--- Reconciliation Report ---")?;
        writeln!(
            f,
            "Processing Time: {:.2} seconds\n",
            summary.processing_duration().as_secs_f64()
        )?;
        writeln!(f, "[Summary]")?;
        writeln!(f, "Total System Transactions Processed: {}", summary.total_system_transactions())?;
        writeln!(f, "Total Bank Transactions Processed:   {}", summary.total_bank_transactions())?;
        writeln!(f, "Matched Transactions:                {}", summary.matched_transactions())?;
        writeln!(f, "Unmatched System Transactions:       {}", summary.unmatched_system_count())?;
        writeln!(f, "Unmatched Bank Transactions:         {}", summary.unmatched_bank_count())?;
        writeln!(
            f,
            "Total Amount Discrepancy:            {}",
            fixed2(summary.amount_discrepancy_total())
        )?;

        if !summary.unmatched_system_transactions().is_empty() {
            writeln!(f, "\n[Unmatched System Transactions]")?;
            for tx in summary.unmatched_system_transactions() {
                writeln!(
                    f,
                    "- ID: {}, Amount: {}, Type: {}, Time: {}",
                    tx.id(),
                    fixed2(tx.amount()),
                    tx.label(),
                    tx.transaction_time().to_rfc3339_opts(SecondsFormat::Secs, true)
                )?;
            }
        }

        if !summary.unmatched_bank_transactions().is_empty() {
            writeln!(f, "\n[Unmatched Bank Transactions]")?;
            for (bank, txs) in summary.unmatched_bank_transactions() {
                writeln!(f, "  Bank: {}", bank)?;
                for tx in txs {
                    writeln!(
                        f,
                        "  - ID: {}, Amount: {} ({}), Date: {}",
                        tx.id(),
                        fixed2(tx.magnitude()),
                        tx.direction(),
                        tx.date().format("%Y-%m-%d")
                    )?;
                }
            }
        }

        write!(f, "\n--- End of Report ---")
    }
}

/// JSON schema for `--format json`.
#[derive(Debug, Serialize)]
pub struct ReportOutput {
    pub processing_seconds: f64,
    pub total_system_transactions: usize,
    pub total_bank_transactions: usize,
    pub matched_transactions: usize,
    pub amount_discrepancy_total: String,
    pub matches: Vec<MatchOutput>,
    pub unmatched_system: Vec<SystemOutput>,
    pub unmatched_bank: Vec<BankGroupOutput>,
}

#[derive(Debug, Serialize)]
pub struct MatchOutput {
    pub system_id: String,
    pub bank_id: String,
    pub bank_name: String,
    pub key: String,
    pub discrepancy: String,
}

#[derive(Debug, Serialize)]
pub struct SystemOutput {
    pub id: String,
    pub amount: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct BankGroupOutput {
    pub bank: String,
    pub transactions: Vec<BankOutput>,
}

#[derive(Debug, Serialize)]
pub struct BankOutput {
    pub id: String,
    /// Absolute value; the sign is carried by `direction`.
    pub amount: String,
    pub direction: String,
    pub date: String,
}

impl From<&SystemTransaction> for SystemOutput {
    fn from(tx: &SystemTransaction) -> Self {
        Self {
            id: tx.id().to_string(),
            amount: fixed2(tx.amount()),
            kind: tx.label().to_string(),
            time: tx.transaction_time().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

impl From<&BankTransaction> for BankOutput {
    fn from(tx: &BankTransaction) -> Self {
        Self {
            id: tx.id().to_string(),
            amount: fixed2(tx.magnitude()),
            direction: tx.direction().to_string(),
            date: tx.date().format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&ReconciliationSummary> for ReportOutput {
    fn from(summary: &ReconciliationSummary) -> Self {
        Self {
            processing_seconds: summary.processing_duration().as_secs_f64(),
            total_system_transactions: summary.total_system_transactions(),
            total_bank_transactions: summary.total_bank_transactions(),
            matched_transactions: summary.matched_transactions(),
            amount_discrepancy_total: fixed2(summary.amount_discrepancy_total()),
            matches: summary
                .matched_pairs()
                .iter()
                .map(|pair| MatchOutput {
                    system_id: pair.system_id.clone(),
                    bank_id: pair.bank_id.clone(),
                    bank_name: pair.bank_name.clone(),
                    key: pair.key.to_string(),
                    discrepancy: fixed2(pair.discrepancy),
                })
                .collect(),
            unmatched_system: summary
                .unmatched_system_transactions()
                .iter()
                .map(SystemOutput::from)
                .collect(),
            unmatched_bank: summary
                .unmatched_bank_transactions()
                .iter()
                .map(|(bank, txs)| BankGroupOutput {
                    bank: bank.clone(),
                    transactions: txs.iter().map(BankOutput::from).collect(),
                })
                .collect(),
        }
    }
}
