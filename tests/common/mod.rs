//! Shared fixtures for integration tests.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use audit_validator::config::{DataFiles, ValidatorConfig};
use audit_validator::http::{build_router, AppState};
use audit_validator::tables::TableStore;
use audit_validator::validation::{FixedClock, RequestValidator};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

pub const REQUESTS_HEADER: &str = "id_request,customer_id,request_date,requested_standard,requested_supplier_site_id,requested_audit_id,audit_scope,contact_information,quality_officer_id";

const CONTACT: &str =
    r#""{""name"":""Ana"",""surname"":""Ruiz"",""email"":""ana@example.com""}""#;

/// Evaluation date used by every test app.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

/// Write the standard data set: six requests, two valid.
///
/// | id | outcome |
/// |----|---------|
/// | R1 | valid |
/// | R2 | valid, supplier 11 unavailable warning |
/// | R3 | invalid, supplier 12 blacklisted |
/// | R4 | invalid, customer missing |
/// | R5 | invalid, customer 2 has no credits |
/// | R6 | invalid, officer 999 unknown |
pub fn write_fixture(dir: &Path) {
    let requests = [
        format!("R1,1,2024-05-01,GMP,10,A1,full,{CONTACT},100"),
        format!("R2,1,2024-05-02,GMP,11,A2,full,{CONTACT},100"),
        format!("R3,1,2024-05-03,ISO 9001,12,A3,full,{CONTACT},100"),
        format!("R4,,2024-05-04,GMP,10,A4,full,{CONTACT},100"),
        format!("R5,2,2024-05-05,GDP,10,A5,full,{CONTACT},100"),
        format!("R6,1,2024-05-06,GMP,10,A6,full,{CONTACT},999"),
    ];
    write_requests(dir, &requests);

    fs::write(
        dir.join("credits.csv"),
        "credit_id,customer_id,credit_state,reserved_date,consumed_date,id_request\n\
         C1,1,available,,,\n\
         C2,2,consumed,2024-01-10,2024-02-10,R0\n",
    )
    .unwrap();
    fs::write(
        dir.join("suppliers.csv"),
        "supplier_site_id,site,country,address,availability\n\
         10,Plant A,ES,1 Main St,TRUE\n\
         11,Plant B,DE,2 Side St,FALSE\n\
         12,Plant C,FR,3 High St,true\n",
    )
    .unwrap();
    fs::write(
        dir.join("quality_officers.csv"),
        "quality_officer_id,quality_officer_name\n100,Grace\n",
    )
    .unwrap();
    fs::write(
        dir.join("supplier_blacklist.csv"),
        "supplier_site_id,blacklist_since,blacklist_until\n\
         12,2024-01-01,2024-12-31\n\
         10,2020-01-01,2020-12-31\n",
    )
    .unwrap();
}

/// Overwrite the requests file with the given data rows.
pub fn write_requests(dir: &Path, rows: &[String]) {
    let mut content = format!("{REQUESTS_HEADER}\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(dir.join("data_requests.csv"), content).unwrap();
}

/// Build the full router over tables loaded from `dir`.
pub fn build_test_app(dir: &Path) -> (Router, Arc<TableStore>) {
    let store = Arc::new(TableStore::open(dir, DataFiles::default()).unwrap());
    let validator = RequestValidator::new(store.clone(), Arc::new(FixedClock(today())));
    let router = build_router(&ValidatorConfig::default(), AppState { validator });
    (router, store)
}

/// Send a request through the router and decode the JSON body.
pub async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
