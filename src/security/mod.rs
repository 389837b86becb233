//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request under the API prefix:
//!     → rate_limit.rs (shared token bucket)      → 429
//!     → cors.rs (origin allow-list)              → 400
//!     → cors.rs (OPTIONS preflight)              → 204
//!     → gate.rs (excluded routes skip auth)      → forward
//!     → auth.rs (bearer token verification)      → 401 | forward
//! ```
//!
//! # Design Decisions
//! - Single synchronous pass; no retries, no state besides the bucket
//! - Fail closed: any failed check ends the request
//! - Allow-lists and exclusions come from configuration

pub mod auth;
pub mod cors;
pub mod error;
pub mod gate;
pub mod rate_limit;

pub use auth::{Claims, TokenVerifier};
pub use error::GateError;
pub use gate::{gate_middleware, Gate, Verdict};
pub use rate_limit::{RateLimiter, TokenBucket};
