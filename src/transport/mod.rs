//! HTTP transport collaborators.
//!
//! # Data Flow
//! ```text
//! HttpstatApi::get200(handler)
//!     → Transport::get("/200")
//!     → "<base_url>/200" (plain concatenation)
//!     → GET over reqwest or hyper-util
//!     → Ok(ProbeResponse) | Err(TransportError)
//! ```
//!
//! # Design Decisions
//! - The base URL is bound at construction; callers only ever pass a path
//! - Any completed exchange is `Ok`, whatever the status code
//! - Errors keep the full source chain of the underlying client error

use std::sync::Arc;

use async_trait::async_trait;
use hyper::body::Bytes;
use axum::http::{HeaderMap, StatusCode, Version};
use thiserror::Error;

use crate::config::{ProbeConfig, TransportKind};

pub mod hyper_transport;
pub mod reqwest_transport;

pub use hyper_transport::HyperTransport;
pub use reqwest_transport::ReqwestTransport;

/// Raw response as received from the wire.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// Response status code.
    pub status: StatusCode,
    /// HTTP version negotiated for the exchange.
    pub version: Version,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body, possibly empty.
    pub body: Bytes,
}

impl ProbeResponse {
    /// Numeric status code.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }
}

/// Transport-level failures. HTTP status codes never end up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Request URL could not be built.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// DNS resolution, TCP connect or TLS handshake failed.
    #[error("connection failed: {0}")]
    Connect(String),

    /// No complete response within the request deadline.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Response head arrived but the body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other protocol or I/O failure.
    #[error("request failed: {0}")]
    Request(String),
}

/// The HTTP client collaborator a probe delegates to.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Base URL every path is appended to.
    fn base_url(&self) -> &str;

    /// Issue `GET <base_url><path>` and return whatever came back.
    async fn get(&self, path: &str) -> Result<ProbeResponse, TransportError>;
}

/// Resolve a relative path against a base URL by concatenation.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url, path)
}

/// Render an error together with every error in its source chain.
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        // hyper and reqwest sometimes repeat the inner message verbatim
        if !message.ends_with(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}

/// Build the collaborator selected by `client.transport`.
pub fn from_config(config: &ProbeConfig) -> Result<Arc<dyn Transport>, TransportError> {
    let transport: Arc<dyn Transport> = match config.client.transport {
        TransportKind::Reqwest => Arc::new(ReqwestTransport::new(
            config.client.base_url.clone(),
            &config.client,
            &config.timeouts,
        )?),
        TransportKind::Hyper => Arc::new(HyperTransport::new(
            config.client.base_url.clone(),
            &config.client,
            &config.timeouts,
        )?),
    };

    tracing::debug!(
        base_url = %transport.base_url(),
        transport = ?config.client.transport,
        "Transport initialized"
    );

    Ok(transport)
}
