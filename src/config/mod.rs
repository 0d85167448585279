//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI overrides (base URL, transport)
//!     → ProbeConfig (validated, immutable)
//!     → transport::from_config builds the collaborator
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The base URL belongs to the collaborator, never to a probe call

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ClientConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::ProbeConfig;
pub use schema::TimeoutConfig;
pub use schema::TransportKind;
pub use validation::{validate_config, ValidationError};
