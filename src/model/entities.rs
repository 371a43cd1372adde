//! Reference table entities.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Contact details embedded in an audit request row as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInformation {
    pub name: String,
    pub surname: String,
    pub email: String,
}

/// A customer's ask to have a supplier site audited against a standard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditRequest {
    /// Request identifier (non-empty).
    pub id: String,
    /// Requesting customer.
    pub customer_id: Option<i64>,
    pub request_date: Option<NaiveDate>,
    /// Standard the audit is performed against (e.g. "GMP").
    pub requested_standard: String,
    /// Supplier site to audit.
    pub requested_supplier_site_id: Option<i64>,
    pub requested_audit_id: String,
    pub audit_scope: String,
    /// Customer contact carried on the request itself.
    pub contact: ContactInformation,
    /// Internal reviewer assigned to the request.
    pub quality_officer_id: Option<i64>,
}

/// Lifecycle state of a credit.
///
/// Parsing is exact and case-sensitive: `"Available"` is not `Available`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreditState {
    Available,
    Reserved,
    Consumed,
    /// Any other literal, kept verbatim.
    Other(String),
}

impl From<&str> for CreditState {
    fn from(s: &str) -> Self {
        match s {
            "available" => CreditState::Available,
            "reserved" => CreditState::Reserved,
            "consumed" => CreditState::Consumed,
            other => CreditState::Other(other.to_string()),
        }
    }
}

/// A consumable unit of audit entitlement owned by a customer.
#[derive(Debug, Clone, PartialEq)]
pub struct Credit {
    pub id: String,
    pub customer_id: Option<i64>,
    pub state: CreditState,
    pub reserved_date: Option<NaiveDate>,
    pub consumed_date: Option<NaiveDate>,
    /// Request that reserved or consumed this credit, if any.
    pub request_id: Option<String>,
}

impl Credit {
    pub fn is_available(&self) -> bool {
        self.state == CreditState::Available
    }
}

/// An audit executor site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Supplier {
    pub site_id: Option<i64>,
    /// Site display name.
    pub site: String,
    pub country: String,
    pub address: String,
    /// Whether the site currently accepts audits.
    pub available: bool,
}

impl Supplier {
    /// Site name and address are both present.
    pub fn is_complete(&self) -> bool {
        !self.site.is_empty() && !self.address.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityOfficer {
    pub id: Option<i64>,
    pub name: String,
}

/// A dated ban window for a supplier site.
#[derive(Debug, Clone, PartialEq)]
pub struct BlacklistEntry {
    pub supplier_site_id: Option<i64>,
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl BlacklistEntry {
    /// Whether the ban is in force on `today`.
    ///
    /// Both bounds are exclusive: the site is free on `since` and on `until`.
    /// An entry with a missing bound is never active.
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        match (self.since, self.until) {
            (Some(since), Some(until)) => since < today && today < until,
            _ => false,
        }
    }
}
