use crate::matching::key::MatchKey;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Direction of a money movement.
///
/// System records carry it explicitly. Bank records never store it: it is
/// inferred from the sign of the amount (see [`TransactionType::from_signed_amount`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Debit,
    Credit,
}

impl TransactionType {
    /// Credit for amounts `>= 0`, Debit for negative amounts.
    pub fn from_signed_amount(amount: Decimal) -> Self {
        if amount < Decimal::ZERO {
            TransactionType::Debit
        } else {
            TransactionType::Credit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Debit => "DEBIT",
            TransactionType::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a direction label is neither `DEBIT` nor `CREDIT`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transaction type '{0}', expected DEBIT or CREDIT")]
pub struct ParseTransactionTypeError(pub String);

impl FromStr for TransactionType {
    type Err = ParseTransactionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        if label.eq_ignore_ascii_case("DEBIT") {
            Ok(TransactionType::Debit)
        } else if label.eq_ignore_ascii_case("CREDIT") {
            Ok(TransactionType::Credit)
        } else {
            Err(ParseTransactionTypeError(label.to_string()))
        }
    }
}

/// A transaction recorded in the internal ledger.
///
/// The amount's sign is informational only; matching compares magnitudes
/// and takes the direction from the type label. The label is kept as read:
/// a ledger row labelled something other than `DEBIT`/`CREDIT` still counts
/// as a ledger record, it just has no [`MatchKey`] and can never be paired.
///
/// # Examples
///
/// ```
/// use bank_reconciler::core::transaction::{SystemTransaction, TransactionType};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal_macros::dec;
///
/// let at = Utc.with_ymd_and_hms(2023, 1, 15, 10, 30, 0).unwrap();
/// let tx = SystemTransaction::new("sys-001", dec!(150.25), TransactionType::Debit, at);
/// assert_eq!(tx.match_key().unwrap().to_string(), "2023-01-15:DEBIT");
///
/// let refund = SystemTransaction::with_label("sys-002", dec!(10), "REFUND", at);
/// assert_eq!(refund.kind(), None);
/// assert!(refund.match_key().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemTransaction {
    /// Ledger-assigned identifier.
    id: String,
    amount: Decimal,
    #[serde(rename = "type")]
    label: String,
    transaction_time: DateTime<Utc>,
}

impl SystemTransaction {
    pub fn new(
        id: impl Into<String>,
        amount: Decimal,
        kind: TransactionType,
        transaction_time: DateTime<Utc>,
    ) -> Self {
        Self::with_label(id, amount, kind.as_str(), transaction_time)
    }

    /// Build a record from a raw type label, which is not validated.
    pub fn with_label(
        id: impl Into<String>,
        amount: Decimal,
        label: impl Into<String>,
        transaction_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            label: label.into(),
            transaction_time,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The type label as it appeared in the ledger.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Direction named by the label, or `None` if it is not DEBIT/CREDIT.
    pub fn kind(&self) -> Option<TransactionType> {
        self.label.parse().ok()
    }

    pub fn transaction_time(&self) -> DateTime<Utc> {
        self.transaction_time
    }

    /// Calendar day of the transaction in UTC, time-of-day dropped.
    pub fn day(&self) -> NaiveDate {
        self.transaction_time.date_naive()
    }

    /// `None` when the label names no direction; such a record never shares
    /// a bucket with any bank record.
    pub fn match_key(&self) -> Option<MatchKey> {
        self.kind().map(|kind| MatchKey::new(self.day(), kind))
    }
}

/// A line from an external bank statement.
///
/// Identifiers are only unique within one statement file, so two records
/// from different banks may share an `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransaction {
    id: String,
    /// Signed amount: negative is a debit, anything else a credit.
    amount: Decimal,
    date: NaiveDate,
    /// Source statement the record was loaded from.
    bank_name: String,
}

impl BankTransaction {
    pub fn new(
        id: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        bank_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            date,
            bank_name: bank_name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn bank_name(&self) -> &str {
        &self.bank_name
    }

    pub fn direction(&self) -> TransactionType {
        TransactionType::from_signed_amount(self.amount)
    }

    /// Absolute value of the amount.
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }

    pub fn match_key(&self) -> MatchKey {
        MatchKey::new(self.date, self.direction())
    }
}
