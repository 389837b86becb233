//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All problems are
//! collected so an operator sees every mistake in one run.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GateConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("auth.jwt_secret is empty (set JWT_SECRET)")]
    MissingSecret,

    #[error("rate_limit.{0} must be greater than zero")]
    ZeroRateSetting(&'static str),

    #[error("{field} '{value}' must start with '/'")]
    RelativePath { field: &'static str, value: String },

    #[error("api_prefix '{0}' must not end with '/'")]
    TrailingSlash(String),

    #[error("no allowed origins configured for the {0} environment")]
    NoOrigins(String),

    #[error("{field} '{value}' is not a socket address")]
    BadAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,
}

/// Check a loaded configuration. Returns every error found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.auth.jwt_secret.is_empty() {
        errors.push(ValidationError::MissingSecret);
    }

    if config.rate_limit.tokens_per_interval == 0 {
        errors.push(ValidationError::ZeroRateSetting("tokens_per_interval"));
    }
    if config.rate_limit.interval_secs == 0 {
        errors.push(ValidationError::ZeroRateSetting("interval_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if !config.api_prefix.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field: "api_prefix",
            value: config.api_prefix.clone(),
        });
    } else if config.api_prefix.len() > 1 && config.api_prefix.ends_with('/') {
        errors.push(ValidationError::TrailingSlash(config.api_prefix.clone()));
    }

    for route in &config.auth.excluded_routes {
        if !route.starts_with('/') {
            errors.push(ValidationError::RelativePath {
                field: "auth.excluded_routes",
                value: route.clone(),
            });
        }
    }

    if config.cors.active_origins().is_empty() {
        errors.push(ValidationError::NoOrigins(config.cors.environment.to_string()));
    }

    let addresses = [
        ("listener.bind_address", &config.listener.bind_address),
        ("upstream.address", &config.upstream.address),
    ];
    for (field, value) in addresses {
        if value.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::BadAddress {
                field,
                value: value.clone(),
            });
        }
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BadAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
