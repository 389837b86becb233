//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: APP_ENV or NODE_ENV, JWT_SECRET, ...)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AuthConfig, CorsConfig, Environment, GateConfig, ListenerConfig, RateLimitConfig,
    UpstreamConfig,
};
