//! Domain model for audit requests and their reference data.
//!
//! # Entities
//! ```text
//! AuditRequest ──customer_id──▶ (customer, carried on the request)
//!      │ ──requested_supplier_site_id──▶ Supplier ◀── BlacklistEntry
//!      │ ──quality_officer_id──▶ QualityOfficer
//! Credit ──customer_id──▶ (customer)
//! ```
//!
//! # Design Decisions
//! - Identifiers are `Option<i64>`; zero, empty and malformed inputs are all unset
//! - Entities are plain data, immutable once a snapshot is built
//! - `ValidationResult` is the only type that crosses the HTTP boundary

pub mod entities;
pub mod result;

pub use entities::{
    AuditRequest, BlacklistEntry, ContactInformation, Credit, CreditState, QualityOfficer,
    Supplier,
};
pub use result::ValidationResult;
