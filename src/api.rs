//! Probe interface for an httpstat-style status echo service.
//!
//! # Responsibilities
//! - Publish `get200` / `get503`, each bound to a fixed relative path
//! - Hand the GET to the transport collaborator off the caller's context
//! - Deliver the outcome to a one-shot completion handler
//!
//! # Design Decisions
//! - Paths are constants on [`Endpoint`], never call-site parameters
//! - Status codes are not interpreted: any completed exchange is a success,
//!   only transport failures reach [`Callback::failure`]
//! - Handlers are consumed by value, so each one can fire at most once;
//!   the dispatch task always fires exactly one branch
//! - If the runtime is torn down mid-flight the handler is dropped uncalled

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::runtime::Handle;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ProbeConfig;
use crate::transport::{self, ProbeResponse, Transport, TransportError};

/// One of the fixed probe endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// `/200`, expected to answer 200 OK.
    Ok,
    /// `/503`, expected to answer 503 Service Unavailable.
    ServiceUnavailable,
}

impl Endpoint {
    pub const ALL: [Endpoint; 2] = [Endpoint::Ok, Endpoint::ServiceUnavailable];

    /// Relative path appended to the collaborator's base URL.
    pub const fn path(self) -> &'static str {
        match self {
            Endpoint::Ok => "/200",
            Endpoint::ServiceUnavailable => "/503",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GET {}", self.path())
    }
}

/// One-shot completion handler with disjoint success and failure branches.
///
/// Implemented for every `FnOnce(Result<ProbeResponse, TransportError>)`,
/// so a closure works wherever a handler is expected.
pub trait Callback: Send + 'static {
    /// The exchange completed; `response` carries whatever status came back.
    fn success(self, response: ProbeResponse);

    /// The transport could not complete the exchange.
    fn failure(self, error: TransportError);
}

impl<F> Callback for F
where
    F: FnOnce(Result<ProbeResponse, TransportError>) + Send + 'static,
{
    fn success(self, response: ProbeResponse) {
        self(Ok(response))
    }

    fn failure(self, error: TransportError) {
        self(Err(error))
    }
}

/// Client for the two httpstat probes.
///
/// Cheap to clone; clones share the same collaborator.
#[derive(Clone)]
pub struct HttpstatApi {
    transport: Arc<dyn Transport>,
    runtime: Handle,
}

impl HttpstatApi {
    /// Bind to a collaborator, dispatching on the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime; use [`HttpstatApi::with_runtime`] there.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_runtime(transport, Handle::current())
    }

    /// Bind to a collaborator, dispatching on an explicit runtime.
    pub fn with_runtime(transport: Arc<dyn Transport>, runtime: Handle) -> Self {
        Self { transport, runtime }
    }

    /// Build the configured collaborator and bind to it.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime, like [`HttpstatApi::new`].
    pub fn from_config(config: &ProbeConfig) -> Result<Self, TransportError> {
        Ok(Self::new(transport::from_config(config)?))
    }

    /// Base URL of the underlying collaborator.
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// `GET <base>/200`, outcome delivered to `callback`.
    pub fn get200<C: Callback>(&self, callback: C) {
        self.probe(Endpoint::Ok, callback)
    }

    /// `GET <base>/503`, outcome delivered to `callback`.
    pub fn get503<C: Callback>(&self, callback: C) {
        self.probe(Endpoint::ServiceUnavailable, callback)
    }

    /// `GET <base>/200`, awaited in place.
    pub async fn fetch200(&self) -> Result<ProbeResponse, TransportError> {
        self.fetch(Endpoint::Ok).await
    }

    /// `GET <base>/503`, awaited in place.
    pub async fn fetch503(&self) -> Result<ProbeResponse, TransportError> {
        self.fetch(Endpoint::ServiceUnavailable).await
    }

    /// Dispatch a probe and return immediately.
    pub fn probe<C: Callback>(&self, endpoint: Endpoint, callback: C) {
        self.probe_with_id(endpoint, Uuid::new_v4(), callback)
    }

    /// Same as [`HttpstatApi::probe`], tagging the dispatch span with a caller-chosen id.
    pub fn probe_with_id<C: Callback>(&self, endpoint: Endpoint, probe_id: Uuid, callback: C) {
        let transport = Arc::clone(&self.transport);
        let span = tracing::debug_span!("probe", probe_id = %probe_id, path = endpoint.path());

        self.runtime.spawn(
            async move {
                match dispatch(transport.as_ref(), endpoint).await {
                    Ok(response) => callback.success(response),
                    Err(error) => callback.failure(error),
                }
            }
            .instrument(span),
        );
    }

    /// Run a probe on the caller's task.
    pub async fn fetch(&self, endpoint: Endpoint) -> Result<ProbeResponse, TransportError> {
        let span = tracing::debug_span!("probe", probe_id = %Uuid::new_v4(), path = endpoint.path());
        dispatch(self.transport.as_ref(), endpoint).instrument(span).await
    }
}

impl fmt::Debug for HttpstatApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpstatApi")
            .field("base_url", &self.transport.base_url())
            .finish()
    }
}

async fn dispatch(
    transport: &dyn Transport,
    endpoint: Endpoint,
) -> Result<ProbeResponse, TransportError> {
    tracing::debug!(base_url = %transport.base_url(), "Dispatching probe");

    let result = transport.get(endpoint.path()).await;
    match &result {
        Ok(response) => {
            tracing::debug!(status = %response.status, "Probe completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Probe failed at transport level");
        }
    }
    result
}
