//! Synthetic ledger / statement generation.
//!
//! Builds a ledger and a set of bank statements that mostly agree, with
//! controllable noise and orphan records on both sides. Used to benchmark
//! the engine and to drive property tests with realistic bucket shapes.

use crate::core::transaction::{BankTransaction, SystemTransaction, TransactionType};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

/// Configuration for a generated reconciliation scenario.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// First calendar day covered.
    pub start: NaiveDate,
    /// Number of consecutive days covered.
    pub days: u32,
    /// Ledger records generated per day.
    pub transactions_per_day: usize,
    /// Number of statements the bank side is split across.
    pub bank_count: usize,
    /// Largest per-record amount difference, in minor units (cents).
    pub max_noise_cents: i64,
    /// Probability that a ledger record has no bank counterpart.
    pub system_orphan_rate: f64,
    /// Extra bank-only records, as a fraction of ledger records.
    pub bank_orphan_rate: f64,
    /// Fixed seed for reproducible output; `None` uses OS entropy.
    pub seed: Option<u64>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid calendar date"),
            days: 30,
            transactions_per_day: 20,
            bank_count: 2,
            max_noise_cents: 50,
            system_orphan_rate: 0.05,
            bank_orphan_rate: 0.05,
            seed: None,
        }
    }
}

/// A generated ledger plus its merged bank statements.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub system: Vec<SystemTransaction>,
    pub bank: Vec<BankTransaction>,
}

/// Generate a scenario according to `config`.
pub fn generate_scenario(config: &ScenarioConfig) -> Scenario {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let bank_names: Vec<String> = (0..config.bank_count.max(1))
        .map(|i| format!("BANK-{:02}.csv", i))
        .collect();

    let mut scenario = Scenario::default();
    let mut seq = 0usize;

    for offset in 0..config.days {
        let date = config.start + Duration::days(i64::from(offset));
        let midnight = date.and_hms_opt(0, 0, 0).expect("midnight exists on every day");
        for _ in 0..config.transactions_per_day {
            seq += 1;
            let kind = if rng.gen_bool(0.5) {
                TransactionType::Credit
            } else {
                TransactionType::Debit
            };
            let cents: i64 = rng.gen_range(100..10_000_000);
            let amount = Decimal::new(cents, 2);
            let seconds = rng.gen_range(0..86_400);
            let time = Utc.from_utc_datetime(&midnight) + Duration::seconds(seconds);

            scenario
                .system
                .push(SystemTransaction::new(format!("SYS-{:06}", seq), amount, kind, time));

            if rng.gen_bool(config.system_orphan_rate.clamp(0.0, 1.0)) {
                continue;
            }

            let noise = if config.max_noise_cents > 0 {
                rng.gen_range(-config.max_noise_cents..=config.max_noise_cents)
            } else {
                0
            };
            let magnitude = (amount + Decimal::new(noise, 2)).abs();
            let bank_name = &bank_names[rng.gen_range(0..bank_names.len())];
            scenario.bank.push(BankTransaction::new(
                format!("TRX-{:06}", seq),
                signed(magnitude, kind),
                date,
                bank_name.as_str(),
            ));

            if rng.gen_bool(config.bank_orphan_rate.clamp(0.0, 1.0)) {
                let cents: i64 = rng.gen_range(100..10_000_000);
                scenario.bank.push(BankTransaction::new(
                    format!("ORPHAN-{:06}", seq),
                    signed(Decimal::new(cents, 2), kind),
                    date,
                    bank_name.as_str(),
                ));
            }
        }
    }

    scenario
}

fn signed(magnitude: Decimal, kind: TransactionType) -> Decimal {
    match kind {
        TransactionType::Credit => magnitude,
        TransactionType::Debit => -magnitude,
    }
}
