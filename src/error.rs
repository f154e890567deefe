//! Error types for the summariq-client library.
//!
//! Three error types reflect three distinct failure points:
//!
//! * [`InputError`]: a selection was rejected locally (wrong document type,
//!   file too large, text too long). Returned when the user picks a file or
//!   sets text, before any submission is attempted.
//!
//! * [`TransportError`]: a single request failed (timeout, refused
//!   connection, 4xx/5xx). Stored inside the submission state so the caller
//!   can show an actionable message and try again.
//!
//! * [`ClientError`]: **Fatal**, the client cannot be used at all (bad
//!   configuration, HTTP client could not be built) or an auxiliary call
//!   failed. Returned as `Err(ClientError)` from the facade.
//!
//! Every failure a user can see during a submission collapses to one
//! [`ErrorKind`], the closed taxonomy the presentation layer switches on.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Closed taxonomy of failure categories surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Nothing to submit: no document selected, or blank text.
    MissingInput,
    /// The last connectivity probe did not succeed.
    BackendUnavailable,
    /// The server rejected the payload (HTTP 400/422).
    InvalidRequest,
    /// The request exceeded its timeout.
    Timeout,
    /// No response was received at all.
    NetworkUnreachable,
    /// The server failed (HTTP 5xx).
    ServerError,
    /// Any other unexpected response.
    Unknown,
}

impl ErrorKind {
    /// Message shown to the user for this kind of failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::MissingInput => {
                "Nothing to summarize. Select a PDF document or paste some text first."
            }
            ErrorKind::BackendUnavailable => {
                "The summarization service is not reachable. Check that it is running, then re-check the connection."
            }
            ErrorKind::InvalidRequest => {
                "The service rejected the request. Check the document or text and try again."
            }
            ErrorKind::Timeout => {
                "The service took too long to answer. Try again, or submit a shorter document."
            }
            ErrorKind::NetworkUnreachable => {
                "Could not reach the summarization service. Check your network connection."
            }
            ErrorKind::ServerError => {
                "The summarization service hit an internal error. Try again in a moment."
            }
            ErrorKind::Unknown => "Something unexpected happened. Please try again.",
        }
    }

    /// Whether the user should be offered a connectivity re-check action.
    pub fn offers_connectivity_retry(&self) -> bool {
        matches!(self, ErrorKind::BackendUnavailable)
    }

    /// Whether the failure was decided locally, without any network call.
    pub fn is_client_side(&self) -> bool {
        matches!(self, ErrorKind::MissingInput | ErrorKind::BackendUnavailable)
    }
}

/// A failed request, as normalised by the transport adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request did not complete within its timeout.
    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// No response was received (connection refused, DNS failure, …).
    #[error("Service unreachable: {detail}")]
    NetworkUnreachable { detail: String },

    /// HTTP 400 or 422; `detail` is the server-provided message.
    #[error("Request rejected (HTTP {status}): {detail}")]
    InvalidRequest { status: u16, detail: String },

    /// HTTP 5xx.
    #[error("Server error (HTTP {status}): {detail}")]
    ServerError { status: u16, detail: String },

    /// Any other non-2xx status, or a 2xx body that could not be used.
    #[error("Unexpected response{}: {detail}", status_suffix(.status))]
    Unknown { status: Option<u16>, detail: String },
}

impl TransportError {
    /// Map an HTTP error status and its extracted detail to a transport error.
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match status {
            400 | 422 => TransportError::InvalidRequest { status, detail },
            500..=599 => TransportError::ServerError { status, detail },
            _ => TransportError::Unknown {
                status: Some(status),
                detail,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TransportError::Timeout { .. } => ErrorKind::Timeout,
            TransportError::NetworkUnreachable { .. } => ErrorKind::NetworkUnreachable,
            TransportError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            TransportError::ServerError { .. } => ErrorKind::ServerError,
            TransportError::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Server-provided or raw detail, if any was attached.
    pub fn detail(&self) -> Option<&str> {
        match self {
            TransportError::Timeout { .. } => None,
            TransportError::NetworkUnreachable { detail }
            | TransportError::InvalidRequest { detail, .. }
            | TransportError::ServerError { detail, .. }
            | TransportError::Unknown { detail, .. } => Some(detail.as_str()),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(s) => format!(" (HTTP {s})"),
        None => String::new(),
    }
}

/// A user selection rejected before it could become part of a submission.
#[derive(Debug, Error)]
pub enum InputError {
    /// The selected file is not the accepted document type.
    #[error("'{name}' is not a PDF document (type: {mime_type})\nOnly PDF files are accepted.")]
    UnsupportedType { name: String, mime_type: String },

    /// The selected file exceeds the configured maximum size.
    #[error("'{name}' is too large ({size} bytes). Maximum size is {max} bytes.")]
    DocumentTooLarge { name: String, size: u64, max: u64 },

    /// Free text exceeds the configured maximum length.
    #[error("Text is too long ({len} characters). Maximum is {max} characters.")]
    TextTooLong { len: usize, max: usize },

    /// The file could not be read from disk.
    #[error("Failed to read '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal and auxiliary-call errors returned by the client facade.
#[derive(Debug, Error)]
pub enum ClientError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    // ── Request errors ────────────────────────────────────────────────────
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Input(#[from] InputError),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_kinds_are_client_side() {
        assert!(ErrorKind::MissingInput.is_client_side());
        assert!(ErrorKind::BackendUnavailable.is_client_side());
        for status in [400, 404, 422, 500, 503] {
            assert!(!TransportError::from_status(status, "x").kind().is_client_side());
        }
        assert!(!TransportError::Timeout { secs: 30 }.kind().is_client_side());
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            TransportError::from_status(400, "bad").kind(),
            ErrorKind::InvalidRequest
        );
        assert_eq!(
            TransportError::from_status(422, "bad").kind(),
            ErrorKind::InvalidRequest
        );
        assert_eq!(
            TransportError::from_status(500, "boom").kind(),
            ErrorKind::ServerError
        );
        assert_eq!(
            TransportError::from_status(503, "busy").kind(),
            ErrorKind::ServerError
        );
        assert_eq!(
            TransportError::from_status(404, "nope").kind(),
            ErrorKind::Unknown
        );
        assert_eq!(
            TransportError::from_status(401, "who").kind(),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn invalid_request_keeps_detail() {
        let e = TransportError::from_status(422, "text must not be empty");
        assert_eq!(e.detail(), Some("text must not be empty"));
        assert!(e.to_string().contains("422"));
    }

    #[test]
    fn unknown_display_with_and_without_status() {
        let with = TransportError::Unknown {
            status: Some(404),
            detail: "Not Found".into(),
        };
        assert!(with.to_string().contains("HTTP 404"), "got: {with}");

        let without = TransportError::Unknown {
            status: None,
            detail: "bad json".into(),
        };
        assert!(!without.to_string().contains("HTTP"), "got: {without}");
    }

    #[test]
    fn timeout_has_no_detail() {
        let e = TransportError::Timeout { secs: 30 };
        assert_eq!(e.detail(), None);
        assert!(e.to_string().contains("30s"));
    }

    #[test]
    fn every_kind_has_a_distinct_message() {
        let kinds = [
            ErrorKind::MissingInput,
            ErrorKind::BackendUnavailable,
            ErrorKind::InvalidRequest,
            ErrorKind::Timeout,
            ErrorKind::NetworkUnreachable,
            ErrorKind::ServerError,
            ErrorKind::Unknown,
        ];
        let mut messages: Vec<&str> = kinds.iter().map(|k| k.user_message()).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), kinds.len());
    }

    #[test]
    fn only_backend_unavailable_offers_recheck() {
        assert!(ErrorKind::BackendUnavailable.offers_connectivity_retry());
        assert!(!ErrorKind::Timeout.offers_connectivity_retry());
        assert!(!ErrorKind::MissingInput.offers_connectivity_retry());
    }

    #[test]
    fn document_too_large_display() {
        let e = InputError::DocumentTooLarge {
            name: "big.pdf".into(),
            size: 12 * 1024 * 1024,
            max: 10 * 1024 * 1024,
        };
        let msg = e.to_string();
        assert!(msg.contains("big.pdf"), "got: {msg}");
        assert!(msg.contains("10485760"), "got: {msg}");
    }
}
