//! Record types shared by every stage.

pub mod summary;
pub mod transaction;
