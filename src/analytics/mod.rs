//! Summary statistics over the reference tables.
//!
//! Read-only aggregations computed on demand from one snapshot; nothing is
//! cached between calls.

pub mod summary;

pub use summary::{CountBy, TableSummary};
