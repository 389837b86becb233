//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → PathPrefixMatcher: is the request under the API prefix?
//!         no  → forwarded ungated
//!         yes → gate runs; ExactPathMatcher decides whether auth is skipped
//! ```
//!
//! # Design Decisions
//! - Matchers built at startup, immutable at runtime
//! - Deterministic: same input always matches the same way

pub mod matcher;

pub use matcher::{ExactPathMatcher, Matcher, PathPrefixMatcher};
