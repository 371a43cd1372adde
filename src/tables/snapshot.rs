//! Immutable snapshot of the five reference tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{AuditRequest, BlacklistEntry, Credit, QualityOfficer, Supplier};

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    pub requests: usize,
    pub credits: usize,
    pub suppliers: usize,
    pub quality_officers: usize,
    pub blacklist_entries: usize,
}

/// One complete, consistent set of reference data.
///
/// Rows are kept in source order. Indexes point at the first row seen for
/// each key, so duplicated keys resolve the way a front-to-back scan would.
#[derive(Debug, Default)]
pub struct ReferenceTables {
    requests: Vec<AuditRequest>,
    credits: Vec<Credit>,
    suppliers: Vec<Supplier>,
    quality_officers: Vec<QualityOfficer>,
    blacklist: Vec<BlacklistEntry>,

    request_index: HashMap<String, usize>,
    supplier_index: HashMap<i64, usize>,
    officer_index: HashMap<i64, usize>,
    available_credits: HashMap<i64, usize>,
}

impl ReferenceTables {
    /// Build a snapshot and its lookup indexes.
    pub fn new(
        requests: Vec<AuditRequest>,
        credits: Vec<Credit>,
        suppliers: Vec<Supplier>,
        quality_officers: Vec<QualityOfficer>,
        blacklist: Vec<BlacklistEntry>,
    ) -> Self {
        let mut request_index = HashMap::with_capacity(requests.len());
        for (idx, request) in requests.iter().enumerate() {
            request_index.entry(request.id.clone()).or_insert(idx);
        }

        let mut supplier_index = HashMap::with_capacity(suppliers.len());
        for (idx, supplier) in suppliers.iter().enumerate() {
            if let Some(id) = supplier.site_id {
                supplier_index.entry(id).or_insert(idx);
            }
        }

        let mut officer_index = HashMap::with_capacity(quality_officers.len());
        for (idx, officer) in quality_officers.iter().enumerate() {
            if let Some(id) = officer.id {
                officer_index.entry(id).or_insert(idx);
            }
        }

        let mut available_credits = HashMap::new();
        for credit in credits.iter().filter(|c| c.is_available()) {
            if let Some(customer) = credit.customer_id {
                *available_credits.entry(customer).or_insert(0) += 1;
            }
        }

        let duplicates = requests.len() - request_index.len();
        if duplicates > 0 {
            tracing::warn!(duplicates, "Request table contains duplicated identifiers");
        }

        Self {
            requests,
            credits,
            suppliers,
            quality_officers,
            blacklist,
            request_index,
            supplier_index,
            officer_index,
            available_credits,
        }
    }

    pub fn requests(&self) -> &[AuditRequest] {
        &self.requests
    }

    pub fn credits(&self) -> &[Credit] {
        &self.credits
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    /// First request with exactly this identifier.
    pub fn find_request(&self, id: &str) -> Option<&AuditRequest> {
        self.request_index.get(id).map(|&idx| &self.requests[idx])
    }

    pub fn find_supplier(&self, site_id: i64) -> Option<&Supplier> {
        self.supplier_index.get(&site_id).map(|&idx| &self.suppliers[idx])
    }

    pub fn find_quality_officer(&self, id: i64) -> Option<&QualityOfficer> {
        self.officer_index.get(&id).map(|&idx| &self.quality_officers[idx])
    }

    /// Number of credits in state `available` owned by the customer.
    pub fn available_credits(&self, customer_id: i64) -> usize {
        self.available_credits.get(&customer_id).copied().unwrap_or(0)
    }

    /// All blacklist entries, historical or current, for a supplier site.
    pub fn blacklist_for(&self, site_id: i64) -> impl Iterator<Item = &BlacklistEntry> {
        self.blacklist
            .iter()
            .filter(move |entry| entry.supplier_site_id == Some(site_id))
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            requests: self.requests.len(),
            credits: self.credits.len(),
            suppliers: self.suppliers.len(),
            quality_officers: self.quality_officers.len(),
            blacklist_entries: self.blacklist.len(),
        }
    }
}
