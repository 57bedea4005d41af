//! Docgate - Rate-Gated Document Submission Client
//!
//! This crate implements a client-side request gate for a remote
//! document-creation API. A [`gate::RateGate`] enforces a hard per-window
//! quota and a bounded pool of concurrency permits; a
//! [`submit::DocumentSubmitter`] wraps each outbound call in an admission,
//! sending through an injected [`transport::Transport`] capability. The gate
//! is process-local by design.

pub mod config;
pub mod error;
pub mod gate;
pub mod submit;
pub mod transport;

pub use config::DocgateConfig;
pub use error::{DocgateError, Result};
pub use gate::{Admission, Permit, RateGate, TimeWindow};
pub use submit::{Document, DocumentSubmitter};
pub use transport::{HttpTransport, Transport};
