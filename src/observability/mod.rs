//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! api.rs / checker.rs / transport
//!     → tracing events (probe_id, path, status, error)
//!     → logging.rs subscriber (pretty or JSON, stderr)
//! ```

pub mod logging;

pub use logging::init_logging;
