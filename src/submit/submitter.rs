//! Gate-wrapped document submission.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::DocgateConfig;
use crate::error::{DocgateError, Result};
use crate::gate::{Admission, RateGate};
use crate::transport::Transport;

/// Submits documents to the remote creation endpoint, one gate admission per
/// call.
///
/// Thread-safe; concurrent `submit` calls share the gate and the transport.
pub struct DocumentSubmitter {
    gate: Arc<RateGate>,
    transport: Arc<dyn Transport>,
    endpoint: String,
}

impl DocumentSubmitter {
    /// Create a submitter and its gate from configuration.
    ///
    /// Fails with [`DocgateError::Config`] on invalid gate parameters.
    pub fn new(config: &DocgateConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let gate = RateGate::new(
            config.gate.request_limit,
            config.gate.max_concurrency(),
            config.gate.window.duration(),
        )?;
        info!(endpoint = %config.endpoint, "Document submitter created");
        Ok(Self {
            gate: Arc::new(gate),
            transport,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Submit one document with its detached signature.
    ///
    /// The payload is serialized before the gate is consulted, so an
    /// unencodable document consumes no quota and no permit. On admission the
    /// permit is held for the duration of the transport call and released on
    /// every exit path.
    pub async fn submit<D>(&self, document: &D, signature: &str) -> Result<Option<String>>
    where
        D: Serialize + ?Sized,
    {
        let body = serde_json::to_string(document)?;

        let permit = match self.gate.acquire().await {
            Admission::Admitted(permit) => permit,
            Admission::Rejected => {
                debug!(endpoint = %self.endpoint, "Request limit reached, submission rejected");
                return Err(DocgateError::RateLimited);
            }
            Admission::Cancelled => {
                debug!("Submission cancelled while waiting for a permit");
                return Err(DocgateError::Cancelled);
            }
        };

        let headers = [
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Signature".to_string(), signature.to_string()),
        ];
        let outcome = self.transport.send(&self.endpoint, &body, &headers).await;
        drop(permit);

        match outcome {
            Ok(response) if response.is_success() => {
                info!(status = response.status, "Document accepted");
                Ok(response.body)
            }
            Ok(response) => {
                warn!(status = response.status, "Remote rejected the document");
                Err(DocgateError::RemoteRejected {
                    status: response.status,
                })
            }
            Err(fault) => {
                warn!(error = %fault, "Transport fault during submission");
                Err(DocgateError::Transport(fault))
            }
        }
    }

    /// The gate guarding this submitter's calls.
    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    /// Stop the gate's window timer and cancel pending waiters.
    pub fn shutdown(&self) {
        self.gate.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateConfig;
    use crate::gate::TimeWindow;
    use crate::submit::{Description, Document};
    use crate::transport::{TransportFault, WireResponse};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Reply {
        Respond(u16, Option<String>),
        Fault,
    }

    struct MockTransport {
        reply: Reply,
        calls: AtomicUsize,
        last_headers: Mutex<Vec<(String, String)>>,
    }

    impl MockTransport {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_headers: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(
            &self,
            _url: &str,
            _body: &str,
            headers: &[(String, String)],
        ) -> std::result::Result<WireResponse, TransportFault> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_headers.lock() = headers.to_vec();
            match &self.reply {
                Reply::Respond(status, body) => Ok(WireResponse {
                    status: *status,
                    body: body.clone(),
                }),
                Reply::Fault => Err(TransportFault::Io("connection reset".to_string())),
            }
        }
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            Err(serde::ser::Error::custom("unencodable payload"))
        }
    }

    fn test_config(request_limit: u64) -> DocgateConfig {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("docgate=trace")
            .try_init();
        DocgateConfig {
            endpoint: "https://example.test/documents/create".to_string(),
            gate: GateConfig {
                window: TimeWindow::Minute,
                request_limit,
                max_concurrency: None,
            },
        }
    }

    fn sample_document() -> Document {
        Document {
            description: Some(Description {
                participant_inn: Some("1234567890".to_string()),
            }),
            doc_id: Some("doc123".to_string()),
            doc_status: Some("active".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_success_returns_body_and_sets_headers() {
        let transport = MockTransport::new(Reply::Respond(200, Some("ok".to_string())));
        let submitter = DocumentSubmitter::new(&test_config(5), transport.clone()).unwrap();

        let body = submitter
            .submit(&sample_document(), "signature123")
            .await
            .unwrap();

        assert_eq!(body.as_deref(), Some("ok"));
        assert_eq!(transport.calls(), 1);
        let headers = transport.last_headers.lock().clone();
        assert!(headers.contains(&("Content-Type".to_string(), "application/json".to_string())));
        assert!(headers.contains(&("Signature".to_string(), "signature123".to_string())));
        assert_eq!(submitter.gate().outstanding(), 0);
    }

    #[tokio::test]
    async fn test_sixth_submission_is_rate_limited() {
        let transport = MockTransport::new(Reply::Respond(200, None));
        let submitter = DocumentSubmitter::new(&test_config(5), transport.clone()).unwrap();
        let document = sample_document();

        for _ in 0..5 {
            submitter.submit(&document, "sig").await.unwrap();
        }
        let err = submitter.submit(&document, "sig").await.unwrap_err();

        assert!(matches!(err, DocgateError::RateLimited));
        // The rejected call never reached the transport.
        assert_eq!(transport.calls(), 5);
        assert_eq!(submitter.gate().issued_in_window(), 5);
    }

    #[tokio::test]
    async fn test_serialization_failure_never_touches_gate() {
        let transport = MockTransport::new(Reply::Respond(200, None));
        let submitter = DocumentSubmitter::new(&test_config(5), transport.clone()).unwrap();

        let err = submitter.submit(&Unencodable, "sig").await.unwrap_err();

        assert!(matches!(err, DocgateError::Serialization(_)));
        assert_eq!(transport.calls(), 0);
        assert_eq!(submitter.gate().issued_in_window(), 0);
        assert_eq!(submitter.gate().outstanding(), 0);
    }

    #[tokio::test]
    async fn test_remote_rejection_surfaces_status_and_releases_permit() {
        let transport = MockTransport::new(Reply::Respond(500, Some("boom".to_string())));
        let submitter = DocumentSubmitter::new(&test_config(5), transport.clone()).unwrap();

        let err = submitter.submit(&sample_document(), "sig").await.unwrap_err();

        assert!(matches!(err, DocgateError::RemoteRejected { status: 500 }));
        assert_eq!(transport.calls(), 1);
        assert_eq!(submitter.gate().outstanding(), 0);
        // Quota was consumed; the call did reach the network.
        assert_eq!(submitter.gate().issued_in_window(), 1);
    }

    #[tokio::test]
    async fn test_transport_fault_releases_permit() {
        let transport = MockTransport::new(Reply::Fault);
        let submitter = DocumentSubmitter::new(&test_config(5), transport.clone()).unwrap();

        let err = submitter.submit(&sample_document(), "sig").await.unwrap_err();

        assert!(matches!(err, DocgateError::Transport(_)));
        assert_eq!(submitter.gate().outstanding(), 0);
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_is_cancelled() {
        let transport = MockTransport::new(Reply::Respond(200, None));
        let submitter = DocumentSubmitter::new(&test_config(5), transport.clone()).unwrap();

        submitter.shutdown();
        let err = submitter.submit(&sample_document(), "sig").await.unwrap_err();

        assert!(matches!(err, DocgateError::Cancelled));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_gate_config_fails_construction() {
        let transport = MockTransport::new(Reply::Respond(200, None));
        let result = DocumentSubmitter::new(&test_config(0), transport);
        assert!(matches!(result, Err(DocgateError::Config(_))));
    }
}
