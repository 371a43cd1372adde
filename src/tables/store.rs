//! Atomically swappable holder of the current reference tables.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::DataFiles;
use crate::observability::metrics;
use crate::tables::loader::{load_tables, LoadError};
use crate::tables::snapshot::{ReferenceTables, TableStats};

/// Publishes one `ReferenceTables` snapshot at a time.
///
/// Readers call [`TableStore::snapshot`] once per operation and keep that
/// `Arc` for its duration, so a concurrent reload is either fully visible or
/// not visible at all.
pub struct TableStore {
    current: ArcSwap<ReferenceTables>,
    default_dir: PathBuf,
    files: DataFiles,
}

impl TableStore {
    /// Wrap an already loaded snapshot.
    pub fn new(tables: ReferenceTables, default_dir: impl Into<PathBuf>, files: DataFiles) -> Self {
        metrics::record_table_sizes(&tables.stats());
        Self {
            current: ArcSwap::from_pointee(tables),
            default_dir: default_dir.into(),
            files,
        }
    }

    /// Load the initial snapshot from `dir`. Any load error is returned as is.
    pub fn open(dir: impl Into<PathBuf>, files: DataFiles) -> Result<Self, LoadError> {
        let dir = dir.into();
        let tables = load_tables(&dir, &files)?;
        Ok(Self::new(tables, dir, files))
    }

    /// The snapshot currently published.
    pub fn snapshot(&self) -> Arc<ReferenceTables> {
        self.current.load_full()
    }

    /// Directory used when a reload names none.
    pub fn default_dir(&self) -> &Path {
        &self.default_dir
    }

    /// File names of the five tables.
    pub fn files(&self) -> &DataFiles {
        &self.files
    }

    /// Load a complete new snapshot and publish it.
    ///
    /// On failure the published snapshot is left untouched.
    pub fn reload(&self, dir: Option<&Path>) -> Result<TableStats, LoadError> {
        let dir = dir.unwrap_or(self.default_dir.as_path());
        self.publish(dir, load_tables(dir, &self.files))
    }

    /// Publish the outcome of a load performed elsewhere.
    ///
    /// A failed load is recorded and the current snapshot kept.
    pub fn publish(
        &self,
        dir: &Path,
        loaded: Result<ReferenceTables, LoadError>,
    ) -> Result<TableStats, LoadError> {
        match loaded {
            Ok(tables) => {
                let stats = tables.stats();
                self.current.store(Arc::new(tables));
                metrics::record_reload("success");
                metrics::record_table_sizes(&stats);
                tracing::info!(dir = %dir.display(), "Reference tables swapped");
                Ok(stats)
            }
            Err(e) => {
                metrics::record_reload("failure");
                tracing::error!(dir = %dir.display(), error = %e, "Reload failed, keeping current tables");
                Err(e)
            }
        }
    }
}
