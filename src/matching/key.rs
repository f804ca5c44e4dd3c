use crate::core::transaction::TransactionType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket identifier shared by both sides of a reconciliation.
///
/// Two records can only be paired when their keys are equal: same UTC
/// calendar day and same direction. The rendered form `YYYY-MM-DD:DIRECTION`
/// is canonical, so struct equality and byte equality of the rendered key
/// coincide.
///
/// # Examples
///
/// ```
/// use bank_reconciler::core::transaction::TransactionType;
/// use bank_reconciler::matching::key::MatchKey;
/// use chrono::NaiveDate;
///
/// let key = MatchKey::new(NaiveDate::from_ymd_opt(2023, 1, 4).unwrap(), TransactionType::Debit);
/// assert_eq!(key.to_string(), "2023-01-04:DEBIT");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchKey {
    pub day: NaiveDate,
    pub direction: TransactionType,
}

impl MatchKey {
    pub fn new(day: NaiveDate, direction: TransactionType) -> Self {
        Self { day, direction }
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.day.format("%Y-%m-%d"), self.direction)
    }
}
