//! Default collaborator backed by `reqwest`.
//!
//! Handles both `http://` and `https://` base URLs and reuses one pooled
//! client for every probe.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::{ClientConfig, TimeoutConfig};
use crate::transport::{error_chain, join_url, ProbeResponse, Transport, TransportError};

pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a client with the configured timeouts and user agent.
    pub fn new(
        base_url: impl Into<String>,
        client_config: &ClientConfig,
        timeouts: &TimeoutConfig,
    ) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs));

        if let Some(user_agent) = &client_config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Request(error_chain(&e)))?;

        Ok(Self::with_client(base_url, client))
    }

    /// Wrap an already configured client.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str) -> Result<ProbeResponse, TransportError> {
        let url = join_url(&self.base_url, path);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(ProbeResponse {
            status,
            version,
            headers,
            body,
        })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = error_chain(&err);
        if err.is_timeout() {
            TransportError::Timeout(message)
        } else if err.is_connect() {
            TransportError::Connect(message)
        } else if err.is_builder() {
            TransportError::InvalidUrl(message)
        } else if err.is_body() || err.is_decode() {
            TransportError::Body(message)
        } else {
            TransportError::Request(message)
        }
    }
}
