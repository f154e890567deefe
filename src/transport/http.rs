//! reqwest-backed [`Transport`].

use super::{DocumentPayload, RawResponse, Request, RequestKind, Transport};
use crate::config::ClientConfig;
use crate::error::{ClientError, TransportError};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Longest raw body echoed back as error detail.
const MAX_DETAIL_CHARS: usize = 500;

/// Sends requests over HTTP to the service named in the [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ClientError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn timeout_for(&self, kind: RequestKind) -> Duration {
        if kind.is_probe() {
            self.config.probe_timeout()
        } else {
            self.config.summarize_timeout()
        }
    }

    fn build(&self, request: Request) -> Result<reqwest::RequestBuilder, TransportError> {
        let c = &self.config;
        let builder = match request {
            Request::Probe => self.client.get(c.root_url("/")),
            Request::Health => self.client.get(c.root_url("/health")),
            Request::SummarizeText(payload) => self
                .client
                .post(c.api_url("/summarize/text"))
                .json(&payload),
            Request::SummarizeDocument(payload) => self
                .client
                .post(c.api_url("/summarize/pdf"))
                .multipart(document_form(payload)?),
            Request::ListSummaries => self.client.get(c.api_url("/summaries")),
            Request::History => self.client.get(c.api_url("/history")),
            Request::ClearHistory => self.client.post(c.api_url("/clear-history")),
        };
        Ok(builder)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<RawResponse, TransportError> {
        let kind = request.kind();
        let timeout = self.timeout_for(kind);
        let start = Instant::now();
        debug!("Sending {} (timeout {}s)", kind, timeout.as_secs());

        let result: Result<RawResponse, TransportError> = async {
            let response = self
                .build(request)?
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| map_reqwest_error(e, timeout))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| map_reqwest_error(e, timeout))?;

            if status.is_success() {
                Ok(RawResponse::new(status.as_u16(), body))
            } else {
                Err(TransportError::from_status(
                    status.as_u16(),
                    extract_detail(status, &body),
                ))
            }
        }
        .await;

        let elapsed_ms = start.elapsed().as_millis();
        match &result {
            Ok(raw) => info!("{} → HTTP {} in {}ms", kind, raw.status, elapsed_ms),
            Err(e) => warn!("{} failed after {}ms: {}", kind, elapsed_ms, e),
        }
        result
    }
}

fn document_form(payload: DocumentPayload) -> Result<Form, TransportError> {
    let DocumentPayload {
        document,
        additional_context,
        title,
    } = payload;

    let part = Part::bytes(document.bytes().to_vec())
        .file_name(document.name().to_string())
        .mime_str(document.mime_type())
        .map_err(|e| TransportError::Unknown {
            status: None,
            detail: format!("invalid document type '{}': {e}", document.mime_type()),
        })?;

    let mut form = Form::new().part("file", part);
    if let Some(ctx) = additional_context {
        form = form.text("additional_context", ctx);
    }
    if let Some(title) = title {
        form = form.text("title", title);
    }
    Ok(form)
}

/// Normalise a reqwest failure that produced no usable response.
fn map_reqwest_error(e: reqwest::Error, timeout: Duration) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout {
            secs: timeout.as_secs(),
        }
    } else if e.is_builder() {
        TransportError::Unknown {
            status: None,
            detail: e.to_string(),
        }
    } else {
        TransportError::NetworkUnreachable {
            detail: e.to_string(),
        }
    }
}

/// Pull a human-readable detail out of an error body.
///
/// The service reports errors as `{"detail": ...}`; validation failures put a
/// structured list there, which is passed through as compact JSON.
fn extract_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail").or_else(|| value.get("message")) {
            Some(serde_json::Value::String(s)) => return s.clone(),
            Some(other) => return other.to_string(),
            None => {}
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.chars().take(MAX_DETAIL_CHARS).collect();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}
