//! CSV ingestion of the reference tables.
//!
//! Every file has a header row followed by one entity per row, columns in a
//! fixed positional order. Rows shorter than the expected width fail the load;
//! unparseable fields inside a row are coerced to unset and logged.

use std::borrow::Cow;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{ByteRecord, StringRecord};
use thiserror::Error;

use crate::config::schema::DataFiles;
use crate::model::{
    AuditRequest, BlacklistEntry, ContactInformation, Credit, CreditState, QualityOfficer,
    Supplier,
};
use crate::tables::snapshot::ReferenceTables;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors that abort loading a whole table set.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened.
    #[error("error loading {table}: cannot open {}: {source}", .path.display())]
    Io {
        table: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not well-formed CSV.
    #[error("error loading {table}: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    /// A row has fewer columns than the table requires.
    #[error("error loading {table}: line {line} has {found} columns, expected {expected}")]
    MissingColumns {
        table: &'static str,
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// Load all five tables from `dir` and build a snapshot.
pub fn load_tables(dir: &Path, files: &DataFiles) -> Result<ReferenceTables, LoadError> {
    tracing::info!(dir = %dir.display(), "Loading reference tables");

    let requests = load_requests(&dir.join(&files.requests))?;
    let credits = load_credits(&dir.join(&files.credits))?;
    let suppliers = load_suppliers(&dir.join(&files.suppliers))?;
    let officers = load_quality_officers(&dir.join(&files.quality_officers))?;
    let blacklist = load_blacklist(&dir.join(&files.blacklist))?;

    let tables = ReferenceTables::new(requests, credits, suppliers, officers, blacklist);
    let stats = tables.stats();
    tracing::info!(
        requests = stats.requests,
        credits = stats.credits,
        suppliers = stats.suppliers,
        quality_officers = stats.quality_officers,
        blacklist_entries = stats.blacklist_entries,
        "Reference tables loaded"
    );
    Ok(tables)
}

/// One data row with field accessors that log and coerce bad values.
struct Row<'a> {
    table: &'static str,
    line: u64,
    record: &'a StringRecord,
}

impl<'a> Row<'a> {
    fn raw(&self, idx: usize) -> &'a str {
        self.record.get(idx).unwrap_or_default()
    }

    fn text(&self, idx: usize) -> String {
        self.raw(idx).to_string()
    }

    fn optional_text(&self, idx: usize) -> Option<String> {
        Some(self.raw(idx)).filter(|s| !s.is_empty()).map(str::to_string)
    }

    /// Integer identifier; zero counts as unset.
    fn id(&self, idx: usize, column: &'static str) -> Option<i64> {
        let raw = self.raw(idx);
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<i64>() {
            Ok(0) => None,
            Ok(id) => Some(id),
            Err(_) => {
                self.malformed(column, raw);
                None
            }
        }
    }

    fn date(&self, idx: usize, column: &'static str) -> Option<NaiveDate> {
        let raw = self.raw(idx);
        if raw.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.malformed(column, raw);
                None
            }
        }
    }

    fn flag(&self, idx: usize) -> bool {
        self.raw(idx).eq_ignore_ascii_case("true")
    }

    fn contact(&self, idx: usize, column: &'static str) -> ContactInformation {
        let raw = self.raw(idx);
        if raw.is_empty() {
            return ContactInformation::default();
        }
        serde_json::from_str(raw).unwrap_or_else(|_| {
            self.malformed(column, raw);
            ContactInformation::default()
        })
    }

    fn malformed(&self, column: &'static str, value: &str) {
        tracing::warn!(
            table = self.table,
            line = self.line,
            column,
            value,
            "Malformed field coerced to unset"
        );
    }
}

/// Read every data row of a CSV file, checking the minimum width.
fn read_rows(table: &'static str, path: &Path, columns: usize) -> Result<Vec<(u64, StringRecord)>, LoadError> {
    tracing::debug!(table, path = %path.display(), "Reading table");

    let file = File::open(path).map_err(|source| LoadError::Io {
        table,
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|source| LoadError::Csv { table, source })?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let record = decode_lossy(table, line, &record);
        if record.len() < columns {
            return Err(LoadError::MissingColumns {
                table,
                line,
                expected: columns,
                found: record.len(),
            });
        }
        rows.push((line, record));
    }
    Ok(rows)
}

/// Decode a raw row, replacing invalid UTF-8 instead of rejecting the file.
fn decode_lossy(table: &'static str, line: u64, record: &ByteRecord) -> StringRecord {
    let fields: Vec<Cow<'_, str>> = record.iter().map(String::from_utf8_lossy).collect();
    for (column, field) in fields.iter().enumerate() {
        if let Cow::Owned(value) = field {
            tracing::warn!(table, line, column, value = %value, "Invalid UTF-8 replaced in field");
        }
    }
    StringRecord::from(fields)
}

fn load_requests(path: &Path) -> Result<Vec<AuditRequest>, LoadError> {
    const TABLE: &str = "requests";
    let rows = read_rows(TABLE, path, 9)?;

    let mut requests = Vec::with_capacity(rows.len());
    for (line, record) in &rows {
        let row = Row { table: TABLE, line: *line, record };
        let id = row.text(0);
        if id.is_empty() {
            tracing::warn!(table = TABLE, line = *line, "Skipping request row without identifier");
            continue;
        }
        requests.push(AuditRequest {
            id,
            customer_id: row.id(1, "customer_id"),
            request_date: row.date(2, "request_date"),
            requested_standard: row.text(3),
            requested_supplier_site_id: row.id(4, "requested_supplier_site_id"),
            requested_audit_id: row.text(5),
            audit_scope: row.text(6),
            contact: row.contact(7, "contact_information"),
            quality_officer_id: row.id(8, "quality_officer_id"),
        });
    }
    Ok(requests)
}

fn load_credits(path: &Path) -> Result<Vec<Credit>, LoadError> {
    const TABLE: &str = "credits";
    let rows = read_rows(TABLE, path, 6)?;

    Ok(rows
        .iter()
        .map(|(line, record)| {
            let row = Row { table: TABLE, line: *line, record };
            Credit {
                id: row.text(0),
                customer_id: row.id(1, "customer_id"),
                state: CreditState::from(row.raw(2)),
                reserved_date: row.date(3, "reserved_date"),
                consumed_date: row.date(4, "consumed_date"),
                request_id: row.optional_text(5),
            }
        })
        .collect())
}

fn load_suppliers(path: &Path) -> Result<Vec<Supplier>, LoadError> {
    const TABLE: &str = "suppliers";
    let rows = read_rows(TABLE, path, 5)?;

    Ok(rows
        .iter()
        .map(|(line, record)| {
            let row = Row { table: TABLE, line: *line, record };
            Supplier {
                site_id: row.id(0, "supplier_site_id"),
                site: row.text(1),
                country: row.text(2),
                address: row.text(3),
                available: row.flag(4),
            }
        })
        .collect())
}

fn load_quality_officers(path: &Path) -> Result<Vec<QualityOfficer>, LoadError> {
    const TABLE: &str = "quality_officers";
    let rows = read_rows(TABLE, path, 2)?;

    Ok(rows
        .iter()
        .map(|(line, record)| {
            let row = Row { table: TABLE, line: *line, record };
            QualityOfficer {
                id: row.id(0, "quality_officer_id"),
                name: row.text(1),
            }
        })
        .collect())
}

fn load_blacklist(path: &Path) -> Result<Vec<BlacklistEntry>, LoadError> {
    const TABLE: &str = "supplier_blacklist";
    let rows = read_rows(TABLE, path, 3)?;

    Ok(rows
        .iter()
        .map(|(line, record)| {
            let row = Row { table: TABLE, line: *line, record };
            BlacklistEntry {
                supplier_site_id: row.id(0, "supplier_site_id"),
                since: row.date(1, "blacklist_since"),
                until: row.date(2, "blacklist_until"),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fixture(dir: &Path) {
        fs::write(
            dir.join("data_requests.csv"),
            "id_request,customer_id,request_date,requested_standard,requested_supplier_site_id,requested_audit_id,audit_scope,contact_information,quality_officer_id\n\
             R1,10,2024-03-01,GMP,100,A1,full,\"{\"\"name\"\":\"\"Ana\"\",\"\"surname\"\":\"\"Ruiz\"\",\"\"email\"\":\"\"ana@example.com\"\"}\",5\n\
             R2,abc,not-a-date,,0,A2,partial,{broken,\n\
             ,10,2024-03-02,GMP,100,A3,full,,5\n",
        )
        .unwrap();
        fs::write(
            dir.join("credits.csv"),
            "credit_id,customer_id,credit_state,reserved_date,consumed_date,id_request\n\
             C1,10,available,,,\n\
             C2,10,consumed,2024-01-01,2024-02-01,R0\n",
        )
        .unwrap();
        fs::write(
            dir.join("suppliers.csv"),
            "supplier_site_id,site,country,address,availability\n\
             100,Plant A,ES,1 Main St,TRUE\n\
             101,Plant B,DE,2 Side St,false\n",
        )
        .unwrap();
        fs::write(
            dir.join("quality_officers.csv"),
            "quality_officer_id,quality_officer_name\n5,Grace\n",
        )
        .unwrap();
        fs::write(
            dir.join("supplier_blacklist.csv"),
            "supplier_site_id,blacklist_since,blacklist_until\n101,2024-01-01,2024-12-31\n",
        )
        .unwrap();
    }

    #[test]
    fn test_load_fixture() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());

        let tables = load_tables(dir.path(), &DataFiles::default()).unwrap();
        let stats = tables.stats();
        assert_eq!(stats.requests, 2, "row without identifier is skipped");
        assert_eq!(stats.credits, 2);
        assert_eq!(stats.suppliers, 2);
        assert_eq!(stats.quality_officers, 1);
        assert_eq!(stats.blacklist_entries, 1);

        let r1 = tables.find_request("R1").unwrap();
        assert_eq!(r1.customer_id, Some(10));
        assert_eq!(r1.contact.name, "Ana");
        assert_eq!(r1.contact.email, "ana@example.com");
        assert_eq!(r1.requested_supplier_site_id, Some(100));
        assert_eq!(r1.quality_officer_id, Some(5));
        assert_eq!(r1.request_date, NaiveDate::from_ymd_opt(2024, 3, 1));

        let s100 = tables.find_supplier(100).unwrap();
        assert!(s100.available);
        assert!(!tables.find_supplier(101).unwrap().available);
        assert_eq!(tables.available_credits(10), 1);
    }

    #[test]
    fn test_malformed_fields_become_unset() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());

        let tables = load_tables(dir.path(), &DataFiles::default()).unwrap();
        let r2 = tables.find_request("R2").unwrap();
        assert_eq!(r2.customer_id, None);
        assert_eq!(r2.request_date, None);
        assert_eq!(r2.requested_supplier_site_id, None);
        assert_eq!(r2.contact, ContactInformation::default());
        assert_eq!(r2.quality_officer_id, None);
    }

    #[test]
    fn test_invalid_utf8_field_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        let mut content = b"id_request,customer_id,request_date,requested_standard,requested_supplier_site_id,requested_audit_id,audit_scope,contact_information,quality_officer_id\n".to_vec();
        content.extend_from_slice(b"R1,10,2024-03-01,GMP,100,A1,full \xff scope,,5\n");
        content.extend_from_slice(b"R2,10,2024-03-02,GMP,100,A2,full,,5\n");
        fs::write(dir.path().join("data_requests.csv"), content).unwrap();

        let tables = load_tables(dir.path(), &DataFiles::default()).unwrap();
        assert_eq!(tables.stats().requests, 2);
        let r1 = tables.find_request("R1").unwrap();
        assert_eq!(r1.audit_scope, "full \u{FFFD} scope");
        assert_eq!(r1.customer_id, Some(10));
        assert_eq!(tables.find_request("R2").unwrap().audit_scope, "full");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_tables(dir.path(), &DataFiles::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { table: "requests", .. }));
    }

    #[test]
    fn test_short_row_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        fs::write(
            dir.path().join("quality_officers.csv"),
            "quality_officer_id\n5\n",
        )
        .unwrap();

        let err = load_tables(dir.path(), &DataFiles::default()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumns { table: "quality_officers", expected: 2, found: 1, .. }
        ));
    }
}
