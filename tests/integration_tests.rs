use bank_reconciler::ingest::csv_reader::CsvLedgerReader;
use bank_reconciler::ingest::error::LoadError;
use bank_reconciler::ingest::range::DateRange;
use bank_reconciler::pipeline::{ReconcileError, ReconcileRequest, Reconciler};
use bank_reconciler::report::{ReportOutput, TextReport};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn january() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
    )
}

const SYSTEM_CSV: &str = "trxID,amount,type,transactionTime
sys001,100.00,CREDIT,2023-01-02T09:15:00Z
sys002,150.25,DEBIT,2023-01-02T11:00:00Z
sys003,99.90,CREDIT,2023-01-03T08:00:00Z
sys004,10000,DEBIT,2023-01-04T10:00:00Z
sys005,100,DEBIT,2023-01-10T10:00:00Z
sys006,200,DEBIT,2023-01-10T12:00:00Z
sys007,75,CREDIT,2023-02-15T10:00:00Z
sys008,oops,CREDIT,2023-01-05T10:00:00Z
";

const BCA_CSV: &str = "unique_identifier,amount,date
bca-1,100.00,2023-01-02
bca-2,-150.00,2023-01-02
bca-3,100,2023-01-03
bca-4,-8000,2023-01-04
";

const MANDIRI_CSV: &str = "unique_identifier,amount,date
bca-1,100,2023-01-03
m-2,-101,2023-01-10
m-3,500,2023-03-01
m-4,12,not-a-date
";

/// Full pipeline: two statements (with a colliding identifier), date
/// filtering, malformed rows, threshold rejection and greedy order.
#[test]
fn full_pipeline_two_banks() {
    let dir = TempDir::new().unwrap();
    let request = ReconcileRequest {
        system_file: write_csv(&dir, "system.csv", SYSTEM_CSV),
        bank_files: vec![
            write_csv(&dir, "bca.csv", BCA_CSV),
            write_csv(&dir, "mandiri.csv", MANDIRI_CSV),
        ],
        range: january(),
    };

    let summary = Reconciler::csv().run(&request).unwrap();

    // sys007 is out of range, sys008 has a bad amount
    assert_eq!(summary.total_system_transactions(), 6);
    // m-3 is out of range, m-4 has a bad date
    assert_eq!(summary.total_bank_transactions(), 6);

    // sys001<->bca-1 (0), sys002<->bca-2 (0.25), sys003<->bca-3 (0.10), sys005<->m-2 (1)
    assert_eq!(summary.matched_transactions(), 4);
    assert_eq!(summary.amount_discrepancy_total(), dec!(1.35));

    let unmatched_system: Vec<&str> = summary
        .unmatched_system_transactions()
        .iter()
        .map(|tx| tx.id())
        .collect();
    assert_eq!(unmatched_system, vec!["sys004", "sys006"]);

    let banks: Vec<&String> = summary.unmatched_bank_transactions().keys().collect();
    assert_eq!(banks, vec!["bca.csv", "mandiri.csv"]);
    assert_eq!(summary.unmatched_bank_transactions()["bca.csv"][0].id(), "bca-4");
    // same identifier as a matched bca.csv record, but kept separately
    assert_eq!(summary.unmatched_bank_transactions()["mandiri.csv"][0].id(), "bca-1");

    assert!(summary.accounts_for_all_inputs());
}

#[test]
fn report_renders_from_pipeline() {
    let dir = TempDir::new().unwrap();
    let request = ReconcileRequest {
        system_file: write_csv(&dir, "system.csv", SYSTEM_CSV),
        bank_files: vec![write_csv(&dir, "bca.csv", BCA_CSV)],
        range: january(),
    };
    let summary = Reconciler::csv().run(&request).unwrap();

    let text = TextReport(&summary).to_string();
    assert!(text.contains("--- Reconciliation Report ---"));
    assert!(text.contains("Bank: bca.csv"));
    assert!(text.contains("- ID: bca-4, Amount: 8000.00 (DEBIT), Date: 2023-01-04"));

    let json = serde_json::to_value(ReportOutput::from(&summary)).unwrap();
    assert_eq!(json["total_bank_transactions"], 4);
    assert!(json["unmatched_system"].as_array().unwrap().len() >= 1);
}

#[test]
fn missing_bank_file_aborts_whole_load() {
    let dir = TempDir::new().unwrap();
    let request = ReconcileRequest {
        system_file: write_csv(&dir, "system.csv", SYSTEM_CSV),
        bank_files: vec![
            write_csv(&dir, "bca.csv", BCA_CSV),
            dir.path().join("missing.csv"),
        ],
        range: january(),
    };

    let err = Reconciler::csv().run(&request).unwrap_err();
    match err {
        ReconcileError::BankLoad(LoadError::Open { path, .. }) => {
            assert!(path.ends_with("missing.csv"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_system_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let request = ReconcileRequest {
        system_file: dir.path().join("nope.csv"),
        bank_files: vec![write_csv(&dir, "bca.csv", BCA_CSV)],
        range: january(),
    };

    let err = Reconciler::csv().run(&request).unwrap_err();
    assert!(matches!(err, ReconcileError::SystemLoad(LoadError::Open { .. })));
    assert_eq!(err.to_string(), "failed to read system transactions");
    assert!(err
        .chain()
        .starts_with("failed to read system transactions: could not open system transaction file"));
}

#[test]
fn unknown_ledger_type_is_kept_as_unmatched() {
    let dir = TempDir::new().unwrap();
    let request = ReconcileRequest {
        system_file: write_csv(
            &dir,
            "system.csv",
            "trxID,amount,type,transactionTime\n\
             sys001,100,REFUND,2023-01-15T10:00:00Z\n\
             sys002,100,CREDIT,2023-01-15T11:00:00Z\n",
        ),
        bank_files: vec![write_csv(
            &dir,
            "bca.csv",
            "unique_identifier,amount,date\nb1,100,2023-01-15\nb2,100,2023-01-15\n",
        )],
        range: january(),
    };

    let summary = Reconciler::csv().run(&request).unwrap();
    assert_eq!(summary.total_system_transactions(), 2);
    assert_eq!(summary.matched_transactions(), 1);
    assert_eq!(summary.unmatched_system_transactions()[0].id(), "sys001");
    assert_eq!(summary.unmatched_system_transactions()[0].label(), "REFUND");
    assert_eq!(summary.unmatched_bank_transactions()["bca.csv"][0].id(), "b2");

    let json = serde_json::to_value(ReportOutput::from(&summary)).unwrap();
    assert_eq!(json["unmatched_system"][0]["type"], "REFUND");
}

#[test]
fn short_statement_row_aborts_run() {
    let dir = TempDir::new().unwrap();
    let request = ReconcileRequest {
        system_file: write_csv(&dir, "system.csv", SYSTEM_CSV),
        bank_files: vec![write_csv(
            &dir,
            "b.csv",
            "unique_identifier,amount,date\nb1,100,2023-01-15\nb2,100\n",
        )],
        range: january(),
    };

    let err = Reconciler::csv().run(&request).unwrap_err();
    assert!(matches!(err, ReconcileError::BankLoad(LoadError::Record { .. })));
}

#[test]
fn empty_statement_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let reader = CsvLedgerReader::new();
    let paths = vec![
        write_csv(&dir, "bca.csv", BCA_CSV),
        write_csv(&dir, "empty.csv", ""),
    ];

    let err = reader.read_bank_statements(&paths, &january()).unwrap_err();
    assert!(matches!(err, LoadError::MissingHeader { .. }));
}

#[test]
fn statements_merge_in_path_order() {
    let dir = TempDir::new().unwrap();
    let reader = CsvLedgerReader::new();
    let paths = vec![
        write_csv(&dir, "mandiri.csv", MANDIRI_CSV),
        write_csv(&dir, "bca.csv", BCA_CSV),
    ];

    let txs = reader.read_bank_statements(&paths, &january()).unwrap();
    let names: Vec<&str> = txs.iter().map(|tx| tx.bank_name()).collect();
    assert_eq!(names, vec!["mandiri.csv", "mandiri.csv", "bca.csv", "bca.csv", "bca.csv", "bca.csv"]);
}

#[test]
fn nothing_in_range_reconciles_to_zero() {
    let dir = TempDir::new().unwrap();
    let december = DateRange::new(
        NaiveDate::from_ymd_opt(2022, 12, 1).unwrap(),
        NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
    );
    let request = ReconcileRequest {
        system_file: write_csv(&dir, "system.csv", SYSTEM_CSV),
        bank_files: vec![write_csv(&dir, "bca.csv", BCA_CSV)],
        range: december,
    };

    let summary = Reconciler::csv().run(&request).unwrap();
    assert_eq!(summary.total_system_transactions(), 0);
    assert_eq!(summary.total_bank_transactions(), 0);
    assert_eq!(summary.amount_discrepancy_total(), Decimal::ZERO);
    assert!(summary.is_fully_reconciled());
}
