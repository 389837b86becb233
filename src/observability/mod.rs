//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate and forwarder produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! Request IDs are attached by the HTTP layer and show up in trace spans.

pub mod logging;
pub mod metrics;
