//! Audit request validation.
//!
//! # Data Flow
//! ```text
//! request id
//!     → orchestrator.rs (load snapshot, find request)
//!     → evaluator.rs
//!         Customer ──fail──▶ stop
//!            │ pass
//!         Supplier ──fail──▶ stop   (availability warning kept)
//!            │ pass
//!         Internal QA ──fail──▶ stop
//!            │ pass
//!         valid
//!     → ValidationResult
//! ```
//!
//! # Design Decisions
//! - Stage order is fixed; the first failing stage ends evaluation
//! - Business-rule failures are data (`ValidationResult`), not `Err`
//! - "Today" comes from a [`Clock`] so date windows are testable

pub mod clock;
pub mod evaluator;
pub mod orchestrator;

use thiserror::Error;

pub use clock::{Clock, FixedClock, SystemClock};
pub use evaluator::{RuleEvaluator, Stage};
pub use orchestrator::{RequestValidator, ValidationReport};

/// Errors raised before any rule is evaluated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Request {0} not found")]
    RequestNotFound(String),
}
