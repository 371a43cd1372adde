//! Request lookup and bulk validation.

use std::sync::Arc;
use std::time::Instant;

use crate::model::ValidationResult;
use crate::observability::metrics;
use crate::tables::TableStore;
use crate::validation::clock::Clock;
use crate::validation::evaluator::RuleEvaluator;
use crate::validation::ValidationError;

/// Outcome of validating every request in one snapshot.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// One entry per request row, in table order.
    pub results: Vec<(String, ValidationResult)>,
}

/// Entry point for validating requests against the published tables.
#[derive(Clone)]
pub struct RequestValidator {
    store: Arc<TableStore>,
    clock: Arc<dyn Clock>,
}

impl RequestValidator {
    pub fn new(store: Arc<TableStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<TableStore> {
        &self.store
    }

    /// Validate the first request with this identifier.
    pub fn validate_one(&self, request_id: &str) -> Result<ValidationResult, ValidationError> {
        let tables = self.store.snapshot();
        let request = tables
            .find_request(request_id)
            .ok_or_else(|| ValidationError::RequestNotFound(request_id.to_string()))?;

        let start = Instant::now();
        let result = RuleEvaluator::new(&tables, self.clock.today()).evaluate(request);
        metrics::record_validation(result.valid, start);

        tracing::info!(request_id, valid = result.valid, "Request validated");
        Ok(result)
    }

    /// Validate every request, each independently.
    pub fn validate_all(&self) -> ValidationReport {
        let tables = self.store.snapshot();
        let evaluator = RuleEvaluator::new(&tables, self.clock.today());

        let mut report = ValidationReport {
            total: tables.requests().len(),
            results: Vec::with_capacity(tables.requests().len()),
            ..Default::default()
        };

        for request in tables.requests() {
            let start = Instant::now();
            let result = evaluator.evaluate(request);
            metrics::record_validation(result.valid, start);

            if result.valid {
                report.valid += 1;
            } else {
                report.invalid += 1;
            }
            report.results.push((request.id.clone(), result));
        }

        tracing::info!(
            total = report.total,
            valid = report.valid,
            invalid = report.invalid,
            "Validation complete"
        );
        report
    }
}
