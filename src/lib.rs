//! API request gate library.
//!
//! Rate limiting, origin filtering, preflight handling and bearer token
//! verification for a dApp's `/api` routes, served as a small forwarding
//! proxy in front of the API server.

pub mod config;
pub mod format;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::GateConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use security::Gate;
