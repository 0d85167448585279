//! Probe client for httpstat-style status echo services.

pub mod api;
pub mod checker;
pub mod config;
pub mod observability;
pub mod transport;

pub use api::{Callback, Endpoint, HttpstatApi};
pub use checker::{Checker, ProbeReport};
pub use config::schema::ProbeConfig;
pub use transport::{ProbeResponse, Transport, TransportError};
