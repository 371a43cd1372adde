//! Audit Request Validator
//!
//! Loads reference data (requests, credits, suppliers, quality officers,
//! supplier blacklist) from CSV files and validates audit requests over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                  AUDIT VALIDATOR                      │
//!   HTTP request  │  ┌────────┐   ┌──────────────┐   ┌───────────────┐   │
//!   ──────────────┼─▶│  http  │──▶│ orchestrator │──▶│   evaluator   │   │
//!                 │  │ server │   │ (lookup/bulk)│   │ cust→supp→QA  │   │
//!   JSON response │  └────────┘   └──────┬───────┘   └───────┬───────┘   │
//!   ◀─────────────┼──────                │ snapshot()        │ reads     │
//!                 │                      ▼                   ▼           │
//!                 │              ┌────────────────────────────────┐      │
//!                 │              │  TableStore (ArcSwap snapshot) │      │
//!                 │              └───────────────▲────────────────┘      │
//!                 │          /load, SIGHUP,      │ atomic swap           │
//!                 │          data watcher ───────┘                       │
//!                 └──────────────────────────────────────────────────────┘
//!                                        ▲
//!                                CSV data directory
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use audit_validator::config::{load_config, ValidatorConfig};
use audit_validator::http::HttpServer;
use audit_validator::lifecycle::{signals, Shutdown};
use audit_validator::observability::{logging, metrics};
use audit_validator::tables::{DataWatcher, TableStore};
use audit_validator::validation::{RequestValidator, SystemClock};
use clap::Parser;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "audit-validator")]
#[command(about = "Validate audit requests against CSV reference data", long_about = None)]
struct Args {
    /// Data directory (overrides `data.dir`).
    data_dir: Option<PathBuf>,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides `listener.bind_address` and `PORT`).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ValidatorConfig::default(),
    };
    config.apply_env();
    if let Some(dir) = args.data_dir {
        config.data.dir = dir;
    }
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("audit-validator v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        data_dir = %config.data.dir.display(),
        watch = config.data.watch,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = match TableStore::open(&config.data.dir, config.data.files.clone()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load reference tables");
            return Err(e.into());
        }
    };

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    tokio::spawn(signals::reload_on_hangup(store.clone(), shutdown.subscribe()));

    let _watcher = if config.data.watch {
        Some(
            DataWatcher::new(&config.data.dir, &config.data.files, store.clone())
                .with_quiet_period(Duration::from_millis(config.data.settle_ms))
                .run()?,
        )
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let validator = RequestValidator::new(store, Arc::new(SystemClock));
    let server = HttpServer::new(config, validator);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
