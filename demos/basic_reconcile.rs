//! Basic reconciliation example.
//!
//! Walks through the scenarios that shape the matching rules: exact
//! matches, tolerated discrepancies, sign-inferred debits, the rejection
//! threshold and greedy first-come consumption.

use bank_reconciler::core::transaction::{BankTransaction, SystemTransaction, TransactionType};
use bank_reconciler::matching::engine::ReconciliationEngine;
use bank_reconciler::report::TextReport;
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

fn main() {
    println!("╔════════════════════════════════════════════╗");
    println!("║  bank-reconciler: Basic Matching Example   ║");
    println!("╚════════════════════════════════════════════╝\n");

    let at = |day: u32, hour: u32| Utc.with_ymd_and_hms(2023, 1, day, hour, 0, 0).unwrap();
    let on = |day: u32| NaiveDate::from_ymd_opt(2023, 1, day).unwrap();

    let system = vec![
        // exact
        SystemTransaction::new("SYS-1", dec!(100), TransactionType::Credit, at(1, 9)),
        // 10 cents short, two equal candidates
        SystemTransaction::new("SYS-2", dec!(99.90), TransactionType::Credit, at(2, 14)),
        // bank side records this as a negative amount
        SystemTransaction::new("SYS-3", dec!(150.25), TransactionType::Debit, at(3, 11)),
        // gap of 2000 is over the threshold
        SystemTransaction::new("SYS-4", dec!(10000), TransactionType::Debit, at(4, 16)),
        // two debits competing for one bank record
        SystemTransaction::new("SYS-5", dec!(100), TransactionType::Debit, at(10, 8)),
        SystemTransaction::new("SYS-6", dec!(200), TransactionType::Debit, at(10, 9)),
    ];

    let bank = vec![
        BankTransaction::new("BCA-1", dec!(100), on(1), "bca.csv"),
        BankTransaction::new("BCA-2", dec!(100), on(2), "bca.csv"),
        BankTransaction::new("MDR-1", dec!(100), on(2), "mandiri.csv"),
        BankTransaction::new("MDR-2", dec!(-150.00), on(3), "mandiri.csv"),
        BankTransaction::new("BCA-3", dec!(-8000), on(4), "bca.csv"),
        BankTransaction::new("BCA-4", dec!(-101), on(10), "bca.csv"),
    ];

    let summary = ReconciliationEngine::new().reconcile(&system, &bank);

    println!("━━━ Matched Pairs ━━━\n");
    for pair in summary.matched_pairs() {
        println!(
            "  {} ↔ {}/{}  [{}]  discrepancy {}",
            pair.system_id, pair.bank_name, pair.bank_id, pair.key, pair.discrepancy
        );
    }

    println!("{}", TextReport(&summary));
}
