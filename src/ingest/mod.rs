//! Loading of ledgers and bank statements into typed records.

pub mod csv_reader;
pub mod error;
pub mod range;
