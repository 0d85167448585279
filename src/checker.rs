//! Reachability check over a set of endpoints.
//!
//! Dispatches every endpoint at once through the callback API and gathers
//! one [`ProbeReport`] per endpoint off an mpsc channel.

use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::api::{Endpoint, HttpstatApi};
use crate::transport::{ProbeResponse, TransportError};

/// Outcome of a single probe.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub probe_id: Uuid,
    pub endpoint: Endpoint,
    pub path: &'static str,
    pub elapsed_ms: u64,
    /// Status code when the exchange completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Transport error otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeReport {
    fn new(
        probe_id: Uuid,
        endpoint: Endpoint,
        elapsed: Duration,
        result: Result<ProbeResponse, TransportError>,
    ) -> Self {
        let (status, error) = match result {
            Ok(response) => (Some(response.status_code()), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            probe_id,
            endpoint,
            path: endpoint.path(),
            elapsed_ms: elapsed.as_millis() as u64,
            status,
            error,
        }
    }

    /// True when the exchange completed, whatever the status code.
    pub fn is_reachable(&self) -> bool {
        self.error.is_none()
    }
}

impl std::fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.status, &self.error) {
            (Some(status), _) => write!(f, "{} -> {} ({} ms)", self.endpoint, status, self.elapsed_ms),
            (None, Some(error)) => write!(f, "{} -> FAILED: {} ({} ms)", self.endpoint, error, self.elapsed_ms),
            (None, None) => write!(f, "{} -> no outcome", self.endpoint),
        }
    }
}

pub struct Checker {
    api: HttpstatApi,
}

impl Checker {
    pub fn new(api: HttpstatApi) -> Self {
        Self { api }
    }

    /// Probe every endpoint concurrently.
    ///
    /// Reports come back in the order the endpoints were given. An endpoint
    /// whose handler was dropped uncalled (runtime shutdown) has no report.
    pub async fn run(&self, endpoints: &[Endpoint]) -> Vec<ProbeReport> {
        let (tx, mut rx) = mpsc::channel(endpoints.len().max(1));

        for (index, &endpoint) in endpoints.iter().enumerate() {
            let tx = tx.clone();
            let probe_id = Uuid::new_v4();
            let started = Instant::now();

            self.api.probe_with_id(endpoint, probe_id, move |result: Result<ProbeResponse, TransportError>| {
                let report = ProbeReport::new(probe_id, endpoint, started.elapsed(), result);
                // try_send cannot fail: capacity covers every endpoint
                let _ = tx.try_send((index, report));
            });
        }
        drop(tx);

        let mut slots: Vec<Option<ProbeReport>> = vec![None; endpoints.len()];
        while let Some((index, report)) = rx.recv().await {
            tracing::info!(
                probe_id = %report.probe_id,
                path = report.path,
                status = ?report.status,
                elapsed_ms = report.elapsed_ms,
                reachable = report.is_reachable(),
                "Probe finished"
            );
            slots[index] = Some(report);
        }

        slots.into_iter().flatten().collect()
    }
}
