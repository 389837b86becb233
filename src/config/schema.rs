//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Root configuration for the API gate.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream API server that surviving requests are forwarded to.
    pub upstream: UpstreamConfig,

    /// Path prefix the gate applies to. Everything else passes through.
    pub api_prefix: String,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Bearer token verification.
    pub auth: AuthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            upstream: UpstreamConfig::default(),
            api_prefix: "/api".to_string(),
            timeouts: TimeoutConfig::default(),
            rate_limit: RateLimitConfig::default(),
            cors: CorsConfig::default(),
            auth: AuthConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Rate limiting configuration.
///
/// One bucket is shared by every API request in the process.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Bucket capacity, also the number of tokens granted per interval.
    pub tokens_per_interval: u32,

    /// Interval length in seconds.
    pub interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            tokens_per_interval: 50,
            interval_secs: 60,
        }
    }
}

/// Deployment environment. Selects which origin allow-list is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    /// Read an environment flag. Anything other than `production` (or
    /// `prod`) selects development, including unknown values.
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
        }
    }
}

/// Cross-origin policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Active environment.
    pub environment: Environment,

    /// Origins allowed in production.
    pub production_origins: Vec<String>,

    /// Origins allowed in development.
    pub development_origins: Vec<String>,

    /// Value of `Access-Control-Allow-Methods` on preflight responses.
    pub allowed_methods: String,

    /// Value of `Access-Control-Allow-Headers` on preflight responses.
    pub allowed_headers: String,
}

impl CorsConfig {
    /// The allow-list for the active environment.
    pub fn active_origins(&self) -> &[String] {
        match self.environment {
            Environment::Production => &self.production_origins,
            Environment::Development => &self.development_origins,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            production_origins: vec![
                "https://roary-pals.vercel.app".to_string(),
                "https://yoursite.com".to_string(),
            ],
            development_origins: vec!["http://localhost:3000".to_string()],
            allowed_methods: "GET, POST, PUT, DELETE, OPTIONS".to_string(),
            allowed_headers: "Content-Type, Authorization".to_string(),
        }
    }
}

/// Bearer token verification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HMAC secret. Usually supplied through `JWT_SECRET`.
    pub jwt_secret: String,

    /// Paths forwarded without authentication (exact match).
    pub excluded_routes: Vec<String>,

    /// Clock skew tolerated when checking `exp`/`nbf`, in seconds.
    pub leeway_secs: u64,
}

impl AuthConfig {
    pub fn excluded_set(&self) -> HashSet<String> {
        self.excluded_routes.iter().cloned().collect()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            excluded_routes: vec![
                "/api/connect-user".to_string(),
                "/api/get-nonce".to_string(),
                "/api/verify-signature".to_string(),
                "/api/tasks/list".to_string(),
                "/api/verify-token".to_string(),
            ],
            leeway_secs: 0,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
