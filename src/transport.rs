//! Transport capability for the outbound call.
//!
//! The submitter treats the transport as an injected dependency so the gate
//! logic can be exercised without a network. [`HttpTransport`] is the
//! production implementation.

use async_trait::async_trait;
use thiserror::Error;
use tracing::trace;

/// Transport-level I/O failure, distinct from a remote rejection.
#[derive(Debug, Error)]
pub enum TransportFault {
    /// The request never produced a response
    #[error("I/O fault: {0}")]
    Io(String),
}

/// A response observed on the wire.
#[derive(Debug, Clone)]
pub struct WireResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, if any
    pub body: Option<String>,
}

impl WireResponse {
    /// Whether the status code indicates success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for the injected send capability.
///
/// Implementations must be safe to share across concurrent submitters.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `body` to `url` with the given headers and return the response,
    /// or a fault if no response was produced.
    async fn send(
        &self,
        url: &str,
        body: &str,
        headers: &[(String, String)],
    ) -> Result<WireResponse, TransportFault>;
}

/// HTTPS transport backed by a shared `reqwest` client.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a fresh connection pool.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a transport around an existing client, e.g. one configured
    /// with custom timeouts.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        url: &str,
        body: &str,
        headers: &[(String, String)],
    ) -> Result<WireResponse, TransportFault> {
        let mut request = self.client.post(url).body(body.to_string());
        for (name, value) in headers {
            request = request.header(name, value);
        }

        trace!(url, "Sending request");
        let response = request
            .send()
            .await
            .map_err(|e| TransportFault::Io(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map(|text| if text.is_empty() { None } else { Some(text) })
            .map_err(|e| TransportFault::Io(e.to_string()))?;

        Ok(WireResponse { status, body })
    }
}
