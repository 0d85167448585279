//! Plain-HTTP collaborator on the hyper-util legacy client.
//!
//! Only `http://` base URLs are supported; the connector does not do TLS.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::USER_AGENT;
use axum::http::{HeaderValue, Method, Request, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;

use crate::config::{ClientConfig, TimeoutConfig};
use crate::transport::{error_chain, join_url, ProbeResponse, Transport, TransportError};

pub struct HyperTransport {
    client: Client<HttpConnector, Body>,
    base_url: String,
    request_timeout: Duration,
    user_agent: Option<HeaderValue>,
}

impl HyperTransport {
    pub fn new(
        base_url: impl Into<String>,
        client_config: &ClientConfig,
        timeouts: &TimeoutConfig,
    ) -> Result<Self, TransportError> {
        let user_agent = match &client_config.user_agent {
            Some(agent) => Some(
                HeaderValue::from_str(agent)
                    .map_err(|e| TransportError::Request(format!("invalid user agent: {}", e)))?,
            ),
            None => None,
        };

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(timeouts.request_secs),
            user_agent,
        })
    }

    async fn exchange(&self, url: &str) -> Result<ProbeResponse, TransportError> {
        let uri: Uri = url
            .parse()
            .map_err(|e| TransportError::InvalidUrl(format!("'{}': {}", url, e)))?;

        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(agent) = &self.user_agent {
            builder = builder.header(USER_AGENT, agent.clone());
        }
        let request = builder
            .body(Body::empty())
            .map_err(|e| TransportError::InvalidUrl(format!("'{}': {}", url, e)))?;

        let response = self.client.request(request).await.map_err(|e| {
            let message = error_chain(&e);
            if e.is_connect() {
                TransportError::Connect(message)
            } else {
                TransportError::Request(message)
            }
        })?;

        let (parts, incoming) = response.into_parts();
        let body = axum::body::to_bytes(Body::new(incoming), usize::MAX)
            .await
            .map_err(|e| TransportError::Body(error_chain(&e)))?;

        Ok(ProbeResponse {
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for HyperTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str) -> Result<ProbeResponse, TransportError> {
        let url = join_url(&self.base_url, path);

        match time::timeout(self.request_timeout, self.exchange(&url)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(format!(
                "no response from {} within {}s",
                url,
                self.request_timeout.as_secs()
            ))),
        }
    }
}
