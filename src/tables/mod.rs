//! Reference tables subsystem.
//!
//! # Data Flow
//! ```text
//! data directory (5 CSV files)
//!     → loader.rs (parse rows, coerce malformed fields to unset)
//!     → snapshot.rs (ReferenceTables + first-match indexes, immutable)
//!     → store.rs (ArcSwap<ReferenceTables>)
//!     → validators load one Arc per call
//!
//! On reload (HTTP, SIGHUP, file watcher):
//!     loader.rs builds a complete new snapshot
//!     → atomic swap in store.rs
//!     → failures leave the published snapshot untouched
//! ```
//!
//! # Design Decisions
//! - A snapshot is all five tables or nothing; readers never see a mix
//! - Lookups keep the first row for a duplicated key
//! - Row-level corruption is tolerated and logged, file-level corruption is fatal

pub mod loader;
pub mod snapshot;
pub mod store;
pub mod watcher;

pub use loader::{load_tables, LoadError};
pub use snapshot::{ReferenceTables, TableStats};
pub use store::TableStore;
pub use watcher::DataWatcher;
