//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request ID, trace span, timeout, body limit)
//!     → handlers.rs (extract query, call RequestValidator / TableStore)
//!     → error.rs (ApiError → status + JSON body)
//!     → JSON response
//! ```
//!
//! # Routes
//! - `GET  /health`
//! - `POST /load?dir=<path>`
//! - `POST /validate`
//! - `POST /validate/request?id=<request id>`
//! - `GET  /stats`

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{build_router, AppState, HttpServer};
