//! Three-stage business rule check for a single audit request.

use std::fmt;

use chrono::NaiveDate;

use crate::model::{AuditRequest, ValidationResult};
use crate::tables::ReferenceTables;

/// Evaluation stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Customer,
    Supplier,
    InternalQa,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Customer => "customer",
            Stage::Supplier => "supplier",
            Stage::InternalQa => "internal_qa",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applies the rules against one snapshot as of one date.
pub struct RuleEvaluator<'a> {
    tables: &'a ReferenceTables,
    today: NaiveDate,
}

impl<'a> RuleEvaluator<'a> {
    pub fn new(tables: &'a ReferenceTables, today: NaiveDate) -> Self {
        Self { tables, today }
    }

    /// Validate a request. Stops at the first failing stage.
    pub fn evaluate(&self, request: &AuditRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        tracing::debug!(request_id = %request.id, today = %self.today, "Starting validation");

        match self.run_stages(request, &mut result) {
            Ok(()) => tracing::debug!(request_id = %request.id, "Request passed all stages"),
            Err(stage) => tracing::warn!(
                request_id = %request.id,
                stage = %stage,
                errors = ?result.errors,
                "Request failed validation"
            ),
        }
        result
    }

    fn run_stages(&self, request: &AuditRequest, result: &mut ValidationResult) -> Result<(), Stage> {
        self.check_customer(request, result)?;
        self.check_supplier(request, result)?;
        self.check_internal_qa(request, result)
    }

    fn check_customer(&self, request: &AuditRequest, result: &mut ValidationResult) -> Result<(), Stage> {
        let Some(customer_id) = request.customer_id else {
            result.error("Customer ID is missing");
            return Err(Stage::Customer);
        };

        if request.contact.name.is_empty() || request.contact.email.is_empty() {
            result.error("Customer contact information is incomplete");
            return Err(Stage::Customer);
        }

        let credits = self.tables.available_credits(customer_id);
        tracing::debug!(customer_id, credits, "Available credits");
        if credits == 0 {
            result.error(format!(
                "Customer {customer_id} has no available credits. Please purchase credits."
            ));
            return Err(Stage::Customer);
        }

        Ok(())
    }

    fn check_supplier(&self, request: &AuditRequest, result: &mut ValidationResult) -> Result<(), Stage> {
        let Some(site_id) = request.requested_supplier_site_id else {
            result.error("Supplier site ID is missing");
            return Err(Stage::Supplier);
        };

        let Some(supplier) = self.tables.find_supplier(site_id) else {
            result.error(format!("Supplier site ID {site_id} not found in database"));
            return Err(Stage::Supplier);
        };

        if !supplier.is_complete() {
            result.error(format!("Supplier {site_id} has incomplete information"));
            return Err(Stage::Supplier);
        }

        if !supplier.available {
            tracing::debug!(site_id, "Supplier not available");
            result.warn(format!(
                "Supplier {site_id} ({}) is currently not available",
                supplier.site
            ));
        }

        if self.tables.blacklist_for(site_id).any(|entry| entry.is_active_on(self.today)) {
            tracing::error!(site_id, site = %supplier.site, "ALERT: supplier is blacklisted");
            result.error(format!(
                "ALERT: Supplier {site_id} ({}) is currently blacklisted! Customer must modify supplier.",
                supplier.site
            ));
            return Err(Stage::Supplier);
        }

        Ok(())
    }

    fn check_internal_qa(&self, request: &AuditRequest, result: &mut ValidationResult) -> Result<(), Stage> {
        let Some(officer_id) = request.quality_officer_id else {
            result.error(
                "Quality officer is not assigned. Please assign a quality officer to complete the request.",
            );
            return Err(Stage::InternalQa);
        };

        let Some(officer) = self.tables.find_quality_officer(officer_id) else {
            result.error(format!("Quality officer ID {officer_id} not found in database"));
            return Err(Stage::InternalQa);
        };

        if request.requested_standard.is_empty() {
            result.error(
                "Requested standard is missing. Internal QA cannot process without this information.",
            );
            return Err(Stage::InternalQa);
        }

        tracing::debug!(officer_id, officer = %officer.name, "Internal QA passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BlacklistEntry, ContactInformation, Credit, CreditState, QualityOfficer, Supplier,
    };

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn request() -> AuditRequest {
        AuditRequest {
            id: "R1".into(),
            customer_id: Some(1),
            requested_standard: "GMP".into(),
            requested_supplier_site_id: Some(10),
            contact: ContactInformation {
                name: "Ana".into(),
                surname: "Ruiz".into(),
                email: "ana@example.com".into(),
            },
            quality_officer_id: Some(100),
            ..Default::default()
        }
    }

    fn credit(customer: i64, state: &str) -> Credit {
        Credit {
            id: "C1".into(),
            customer_id: Some(customer),
            state: CreditState::from(state),
            reserved_date: None,
            consumed_date: None,
            request_id: None,
        }
    }

    fn supplier(available: bool) -> Supplier {
        Supplier {
            site_id: Some(10),
            site: "S1".into(),
            country: "ES".into(),
            address: "1 Main St".into(),
            available,
        }
    }

    fn officer() -> QualityOfficer {
        QualityOfficer { id: Some(100), name: "Grace".into() }
    }

    fn ban(since: &str, until: &str) -> BlacklistEntry {
        BlacklistEntry {
            supplier_site_id: Some(10),
            since: Some(date(since)),
            until: Some(date(until)),
        }
    }

    struct Fixture {
        credits: Vec<Credit>,
        suppliers: Vec<Supplier>,
        officers: Vec<QualityOfficer>,
        blacklist: Vec<BlacklistEntry>,
    }

    impl Fixture {
        fn happy() -> Self {
            Self {
                credits: vec![credit(1, "available")],
                suppliers: vec![supplier(true)],
                officers: vec![officer()],
                blacklist: vec![],
            }
        }

        fn evaluate_on(self, req: &AuditRequest, today: &str) -> ValidationResult {
            let tables = ReferenceTables::new(
                vec![req.clone()],
                self.credits,
                self.suppliers,
                self.officers,
                self.blacklist,
            );
            RuleEvaluator::new(&tables, date(today)).evaluate(req)
        }

        fn evaluate(self, req: &AuditRequest) -> ValidationResult {
            self.evaluate_on(req, "2024-06-15")
        }
    }

    #[test]
    fn test_all_stages_pass() {
        let result = Fixture::happy().evaluate(&request());
        assert_eq!(result, ValidationResult::new());
    }

    #[test]
    fn test_missing_customer_single_error() {
        let mut req = request();
        req.customer_id = None;

        let result = Fixture::happy().evaluate(&req);
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["Customer ID is missing"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_incomplete_contact() {
        let mut req = request();
        req.contact.email.clear();

        let result = Fixture::happy().evaluate(&req);
        assert_eq!(result.errors, vec!["Customer contact information is incomplete"]);

        let mut req = request();
        req.contact.name.clear();
        req.contact.surname.clear();
        let result = Fixture::happy().evaluate(&req);
        assert_eq!(result.errors, vec!["Customer contact information is incomplete"]);
    }

    #[test]
    fn test_no_available_credits_short_circuits() {
        let mut fixture = Fixture::happy();
        fixture.credits = vec![credit(1, "consumed"), credit(1, "Available"), credit(2, "available")];
        // Later stages would also fail if they ran.
        fixture.suppliers.clear();
        fixture.officers.clear();

        let result = fixture.evaluate(&request());
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec!["Customer 1 has no available credits. Please purchase credits."]
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_supplier_site_id() {
        let mut req = request();
        req.requested_supplier_site_id = None;

        let result = Fixture::happy().evaluate(&req);
        assert_eq!(result.errors, vec!["Supplier site ID is missing"]);
    }

    #[test]
    fn test_unknown_supplier() {
        let mut req = request();
        req.requested_supplier_site_id = Some(99);

        let result = Fixture::happy().evaluate(&req);
        assert_eq!(result.errors, vec!["Supplier site ID 99 not found in database"]);
    }

    #[test]
    fn test_incomplete_supplier() {
        let mut fixture = Fixture::happy();
        fixture.suppliers[0].address.clear();

        let result = fixture.evaluate(&request());
        assert_eq!(result.errors, vec!["Supplier 10 has incomplete information"]);
    }

    #[test]
    fn test_unavailable_supplier_is_warning_only() {
        let mut fixture = Fixture::happy();
        fixture.suppliers = vec![supplier(false)];

        let result = fixture.evaluate(&request());
        assert!(result.valid);
        assert_eq!(result.warnings, vec!["Supplier 10 (S1) is currently not available"]);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_active_blacklist_fails_and_skips_qa() {
        let mut fixture = Fixture::happy();
        fixture.blacklist = vec![ban("2024-01-01", "2024-12-31")];
        fixture.officers.clear();

        let result = fixture.evaluate(&request());
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec!["ALERT: Supplier 10 (S1) is currently blacklisted! Customer must modify supplier."]
        );
    }

    #[test]
    fn test_blacklisted_and_unavailable_keeps_warning() {
        let mut fixture = Fixture::happy();
        fixture.suppliers = vec![supplier(false)];
        fixture.blacklist = vec![ban("2024-01-01", "2024-12-31")];

        let result = fixture.evaluate(&request());
        assert!(!result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("ALERT"));
    }

    #[test]
    fn test_blacklist_boundary_dates_not_blacklisted() {
        for today in ["2024-01-01", "2024-12-31", "2023-06-15", "2025-01-01"] {
            let mut fixture = Fixture::happy();
            fixture.blacklist = vec![ban("2024-01-01", "2024-12-31")];
            let result = fixture.evaluate_on(&request(), today);
            assert!(result.valid, "not blacklisted on {today}");
        }
        for today in ["2024-01-02", "2024-12-30"] {
            let mut fixture = Fixture::happy();
            fixture.blacklist = vec![ban("2024-01-01", "2024-12-31")];
            let result = fixture.evaluate_on(&request(), today);
            assert!(!result.valid, "blacklisted on {today}");
        }
    }

    #[test]
    fn test_expired_history_does_not_block() {
        let mut fixture = Fixture::happy();
        fixture.blacklist = vec![ban("2020-01-01", "2020-12-31"), ban("2022-01-01", "2022-06-30")];

        let result = fixture.evaluate(&request());
        assert!(result.valid);
    }

    #[test]
    fn test_officer_not_assigned() {
        let mut req = request();
        req.quality_officer_id = None;

        let result = Fixture::happy().evaluate(&req);
        assert_eq!(
            result.errors,
            vec!["Quality officer is not assigned. Please assign a quality officer to complete the request."]
        );
    }

    #[test]
    fn test_officer_unknown() {
        let mut req = request();
        req.quality_officer_id = Some(7);

        let result = Fixture::happy().evaluate(&req);
        assert_eq!(result.errors, vec!["Quality officer ID 7 not found in database"]);
    }

    #[test]
    fn test_missing_standard_fails_qa_with_warning_kept() {
        let mut req = request();
        req.requested_standard.clear();
        let mut fixture = Fixture::happy();
        fixture.suppliers = vec![supplier(false)];

        let result = fixture.evaluate(&req);
        assert!(!result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(
            result.errors,
            vec!["Requested standard is missing. Internal QA cannot process without this information."]
        );
    }
}
