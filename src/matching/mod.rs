//! Bucketing and best-fit matching of ledger records against bank records.

pub mod engine;
pub mod grouping;
pub mod key;
