//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Load tables → Start background tasks → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Reload reference tables
//! ```
//!
//! # Design Decisions
//! - Fail fast: a config or initial load error is fatal
//! - Listener starts last (traffic only when tables are ready)

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
