//! Transport adapter: the only layer that talks to the network.
//!
//! Each [`Request`] knows its [`RequestKind`], which decides the endpoint,
//! the body encoding and the timeout. Implementations return the raw 2xx
//! response or a [`TransportError`] already normalised into the error
//! taxonomy. They keep no state between calls.
//!
//! ```text
//! Request ──▶ Transport::send ──▶ RawResponse (2xx)
//!                              └─▶ TransportError (timeout / unreachable / 4xx / 5xx)
//! ```
//!
//! [`HttpTransport`] is the reqwest-backed implementation; tests substitute
//! their own `Transport` to script responses.

pub mod http;

pub use http::HttpTransport;

use crate::error::TransportError;
use crate::input::UploadedDocument;
use serde::Serialize;
use std::fmt;

/// What a request is for. Selects endpoint, encoding and timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// `GET /` on the service root.
    ConnectivityProbe,
    /// `GET /health` on the service root.
    HealthCheck,
    /// `POST {api}/summarize/text`, JSON body.
    TextSummarize,
    /// `POST {api}/summarize/pdf`, multipart body.
    DocumentSummarize,
    /// `GET {api}/summaries`.
    ListSummaries,
    /// `GET {api}/history`.
    History,
    /// `POST {api}/clear-history`.
    ClearHistory,
}

impl RequestKind {
    /// Probes and health checks use the short timeout.
    pub fn is_probe(&self) -> bool {
        matches!(self, RequestKind::ConnectivityProbe | RequestKind::HealthCheck)
    }

    pub fn is_summarize(&self) -> bool {
        matches!(self, RequestKind::TextSummarize | RequestKind::DocumentSummarize)
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestKind::ConnectivityProbe => "connectivity probe",
            RequestKind::HealthCheck => "health check",
            RequestKind::TextSummarize => "text summarize",
            RequestKind::DocumentSummarize => "document summarize",
            RequestKind::ListSummaries => "list summaries",
            RequestKind::History => "history",
            RequestKind::ClearHistory => "clear history",
        };
        f.write_str(s)
    }
}

/// JSON body of a text summarization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextPayload {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Fields of a document summarization request.
#[derive(Debug, Clone)]
pub struct DocumentPayload {
    pub document: UploadedDocument,
    pub additional_context: Option<String>,
    pub title: Option<String>,
}

/// An outbound request.
#[derive(Debug, Clone)]
pub enum Request {
    Probe,
    Health,
    SummarizeText(TextPayload),
    SummarizeDocument(DocumentPayload),
    ListSummaries,
    History,
    ClearHistory,
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::Probe => RequestKind::ConnectivityProbe,
            Request::Health => RequestKind::HealthCheck,
            Request::SummarizeText(_) => RequestKind::TextSummarize,
            Request::SummarizeDocument(_) => RequestKind::DocumentSummarize,
            Request::ListSummaries => RequestKind::ListSummaries,
            Request::History => RequestKind::History,
            Request::ClearHistory => RequestKind::ClearHistory,
        }
    }
}

/// A successful (2xx) response, body not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON. Undecodable bodies become
    /// [`TransportError::Unknown`] carrying the decode error.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_str(&self.body).map_err(|e| TransportError::Unknown {
            status: Some(self.status),
            detail: format!("undecodable response body: {e}"),
        })
    }
}

/// Sends requests to the summarization service.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<RawResponse, TransportError>;
}
