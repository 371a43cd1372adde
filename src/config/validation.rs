//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect clashing data file names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ValidatorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ValidatorConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid {field} '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("data file name for {0} is empty")]
    EmptyFileName(&'static str),

    #[error("data file '{0}' is used by more than one table")]
    DuplicateFileName(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ValidatorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    if config.data.watch && config.data.settle_ms == 0 {
        errors.push(ValidationError::Zero("data.settle_ms"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }

    let mut seen = HashSet::new();
    for (table, file) in config.data.files.entries() {
        if file.is_empty() {
            errors.push(ValidationError::EmptyFileName(table));
        } else if !seen.insert(file) {
            errors.push(ValidationError::DuplicateFileName(file.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
