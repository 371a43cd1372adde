//! Dashboard-style aggregates over requests, credits and suppliers.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::tables::ReferenceTables;

/// A labelled count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBy {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub total_requests: usize,
    /// Distinct customers owning at least one credit.
    pub total_customers: usize,
    /// Mean available credits among customers that have any, one decimal.
    pub avg_available_credits: f64,
    pub available_suppliers: usize,
    /// Requests per supplier country, most requested first.
    pub requests_by_country: Vec<CountBy>,
    /// Requests per requested standard, alphabetical.
    pub requests_by_standard: Vec<CountBy>,
}

impl TableSummary {
    pub fn from_tables(tables: &ReferenceTables) -> Self {
        let customers: BTreeSet<i64> = tables
            .credits()
            .iter()
            .filter_map(|c| c.customer_id)
            .collect();

        let mut available_per_customer: HashMap<i64, usize> = HashMap::new();
        for credit in tables.credits().iter().filter(|c| c.is_available()) {
            if let Some(customer) = credit.customer_id {
                *available_per_customer.entry(customer).or_default() += 1;
            }
        }
        let avg_available_credits = if available_per_customer.is_empty() {
            0.0
        } else {
            let total: usize = available_per_customer.values().sum();
            round_one(total as f64 / available_per_customer.len() as f64)
        };

        let mut by_country: BTreeMap<&str, usize> = BTreeMap::new();
        let mut by_standard: BTreeMap<&str, usize> = BTreeMap::new();
        for request in tables.requests() {
            if let Some(supplier) = request
                .requested_supplier_site_id
                .and_then(|id| tables.find_supplier(id))
            {
                *by_country.entry(supplier.country.as_str()).or_default() += 1;
            }
            if !request.requested_standard.is_empty() {
                *by_standard.entry(request.requested_standard.as_str()).or_default() += 1;
            }
        }

        let mut requests_by_country = into_counts(by_country);
        // Stable sort keeps alphabetical order among equal counts.
        requests_by_country.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            total_requests: tables.requests().len(),
            total_customers: customers.len(),
            avg_available_credits,
            available_suppliers: tables.suppliers().iter().filter(|s| s.available).count(),
            requests_by_country,
            requests_by_standard: into_counts(by_standard),
        }
    }
}

fn into_counts(map: BTreeMap<&str, usize>) -> Vec<CountBy> {
    map.into_iter()
        .map(|(key, count)| CountBy { key: key.to_string(), count })
        .collect()
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
