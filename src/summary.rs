//! Response schemas and the decoded [`SummaryResult`].
//!
//! Two shapes of the summarize response exist in the wild: an older one with
//! only `title`, `summary`, `success`, `message`, and the current one that
//! adds `word_count`, `processing_time`, `saved_path` and, for uploads,
//! `original_filename`. [`SummaryResponse`] is the canonical schema: the
//! `success`-flag object, with the newer fields optional so both decode.

use crate::error::TransportError;
use crate::transport::RawResponse;
use serde::{Deserialize, Serialize};

/// Canonical body of a 2xx summarize response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub word_count: u64,
    #[serde(default)]
    pub processing_time: f64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub saved_path: Option<String>,
}

/// A summary as received from the service. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub title: String,
    pub body: String,
    pub word_count: u64,
    pub processing_time_seconds: f64,
    pub source_file_name: Option<String>,
    pub storage_path: Option<String>,
    /// Status line from the service, e.g. "PDF summarized successfully".
    pub message: Option<String>,
}

impl SummaryResult {
    /// Decode a raw summarize response.
    ///
    /// `success: false` is reported as [`TransportError::Unknown`] with the
    /// service message as detail.
    pub fn from_response(raw: &RawResponse) -> Result<Self, TransportError> {
        let response: SummaryResponse = raw.json()?;
        Self::try_from_response(response, raw.status)
    }

    fn try_from_response(response: SummaryResponse, status: u16) -> Result<Self, TransportError> {
        if !response.success {
            return Err(TransportError::Unknown {
                status: Some(status),
                detail: response
                    .message
                    .unwrap_or_else(|| "Failed to generate summary".to_string()),
            });
        }
        Ok(Self {
            title: response.title,
            body: response.summary,
            word_count: response.word_count,
            processing_time_seconds: response.processing_time,
            source_file_name: response.original_filename.filter(|s| !s.is_empty()),
            storage_path: response.saved_path.filter(|s| !s.is_empty()),
            message: response.message,
        })
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

/// One saved summary file, as listed by `GET {api}/summaries`.
///
/// The service lists what it has on disk, newest first: the file name, its
/// creation time in Unix seconds and its size in bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub filename: String,
    #[serde(default)]
    pub created_at: f64,
    #[serde(default)]
    pub size: u64,
}

/// The service answers either with a bare array or wrapped in `summaries`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SummaryList {
    Bare(Vec<SummaryRecord>),
    Wrapped { summaries: Vec<SummaryRecord> },
}

impl SummaryList {
    pub(crate) fn into_records(self) -> Vec<SummaryRecord> {
        match self {
            SummaryList::Bare(records) | SummaryList::Wrapped { summaries: records } => records,
        }
    }
}

/// One turn of the service-side conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

/// Body of the probe and clear-history endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MessageResponse {
    pub message: String,
}
