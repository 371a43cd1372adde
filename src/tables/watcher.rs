//! Data directory watcher for hot reload of the reference tables.
//!
//! File events are not acted on directly. A table file being rewritten emits
//! many events, and loading between them would publish a truncated table.
//! Events feed a channel instead, and a reload runs once the directory has
//! been quiet for the configured period. A load that overlaps further events
//! is discarded and retried after the next quiet period.
//!
//! Writers that pause longer than the quiet period mid-file should write to a
//! temporary name and rename it into place.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::schema::DataFiles;
use crate::tables::loader::load_tables;
use crate::tables::store::TableStore;

const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Watches the data directory and reloads the store when a table file changes.
pub struct DataWatcher {
    dir: PathBuf,
    files: HashSet<OsString>,
    store: Arc<TableStore>,
    quiet: Duration,
}

impl DataWatcher {
    /// Create a watcher for the table files named in `files` under `dir`.
    pub fn new(dir: &Path, files: &DataFiles, store: Arc<TableStore>) -> Self {
        Self {
            dir: dir.to_path_buf(),
            files: files.entries().into_iter().map(|(_, f)| OsString::from(f)).collect(),
            store,
            quiet: DEFAULT_QUIET_PERIOD,
        }
    }

    /// How long the directory must stay unchanged before a reload.
    pub fn with_quiet_period(mut self, quiet: Duration) -> Self {
        self.quiet = quiet;
        self
    }

    /// Start watching in the background. Drop the returned watcher to stop.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let (tx, rx) = mpsc::unbounded_channel();
        let files = self.files;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if is_relevant(&files, &event) {
                        tracing::debug!(paths = ?event.paths, "Data file change detected");
                        let _ = tx.send(());
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.dir, quiet_ms = self.quiet.as_millis() as u64, "Data watcher started");
        tokio::spawn(reload_when_settled(rx, self.quiet, self.store, self.dir));
        Ok(watcher)
    }
}

/// Whether an event touches one of the table files.
fn is_relevant(files: &HashSet<OsString>, event: &Event) -> bool {
    (event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove())
        && event
            .paths
            .iter()
            .filter_map(|p| p.file_name())
            .any(|name| files.contains(name))
}

/// Drain events until none arrives for `quiet`.
///
/// Returns `false` once the watcher is gone.
async fn settle(events: &mut mpsc::UnboundedReceiver<()>, quiet: Duration) -> bool {
    loop {
        match tokio::time::timeout(quiet, events.recv()).await {
            Ok(Some(())) => continue,
            Ok(None) => return false,
            Err(_) => return true,
        }
    }
}

async fn reload_when_settled(
    mut events: mpsc::UnboundedReceiver<()>,
    quiet: Duration,
    store: Arc<TableStore>,
    dir: PathBuf,
) {
    while events.recv().await.is_some() {
        if !settle(&mut events, quiet).await {
            break;
        }

        tracing::info!(dir = %dir.display(), "Data files settled, reloading");
        let (loader_store, loader_dir) = (store.clone(), dir.clone());
        let loaded = match tokio::task::spawn_blocking(move || {
            load_tables(&loader_dir, loader_store.files())
        })
        .await
        {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!(error = %e, "Reload task panicked");
                continue;
            }
        };

        if !events.is_empty() {
            tracing::info!("Data files changed while loading, waiting for them to settle");
            continue;
        }

        if let Err(e) = store.publish(&dir, loaded) {
            tracing::error!("Failed to reload tables: {}. Keeping current tables.", e);
        }
    }
    tracing::debug!("Data watcher stopped");
}
