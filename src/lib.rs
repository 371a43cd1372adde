//! Audit request validation service library.

pub mod analytics;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod tables;
pub mod validation;

pub use config::ValidatorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use model::ValidationResult;
pub use tables::{ReferenceTables, TableStore};
pub use validation::RequestValidator;
