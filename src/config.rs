//! Configuration types for the summarization client.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. The backend location is part of the config and is
//! injected into the transport at construction, so tests can point a client
//! at a mock server without touching process-wide state.

use crate::error::ClientError;
use crate::progress::SubmissionObserver;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The only document type the service accepts.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Configuration for a [`crate::SummarizerClient`].
///
/// Built via [`ClientConfig::builder()`] or using [`ClientConfig::default()`].
///
/// # Example
/// ```rust
/// use summariq_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://127.0.0.1:8000")
///     .summarize_timeout_secs(45)
///     .build()
///     .unwrap();
/// assert_eq!(config.api_url("/summarize/text"), "http://127.0.0.1:8000/api/summarize/text");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Service root, e.g. `http://localhost:8000`. Default: `http://localhost:8000`.
    ///
    /// The connectivity probe (`GET /`) and health check (`GET /health`) are
    /// issued against this root; summarization endpoints live under
    /// [`api_prefix`](Self::api_prefix).
    pub base_url: String,

    /// Path prefix of the summarization API. Default: `/api`.
    pub api_prefix: String,

    /// Timeout for summarization and other API calls, in seconds. Default: 30.
    pub summarize_timeout_secs: u64,

    /// Timeout for connectivity probes and health checks, in seconds. Default: 5.
    pub probe_timeout_secs: u64,

    /// TCP connect timeout, in seconds. Default: 10.
    pub connect_timeout_secs: u64,

    /// Local input constraints checked before any request is issued.
    pub limits: InputLimits,

    /// How long the "just pasted" indicator stays active. Default: 2 s.
    pub paste_indicator: Duration,

    /// Receives phase transitions and outcomes of submissions.
    pub observer: Option<Arc<dyn SubmissionObserver>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_prefix: "/api".to_string(),
            summarize_timeout_secs: 30,
            probe_timeout_secs: 5,
            connect_timeout_secs: 10,
            limits: InputLimits::default(),
            paste_indicator: Duration::from_secs(2),
            observer: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_prefix", &self.api_prefix)
            .field("summarize_timeout_secs", &self.summarize_timeout_secs)
            .field("probe_timeout_secs", &self.probe_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("limits", &self.limits)
            .field("paste_indicator", &self.paste_indicator)
            .field(
                "observer",
                &self.observer.as_ref().map(|_| "<dyn SubmissionObserver>"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// URL of a path on the service root (probe, health).
    pub fn root_url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// URL of a path under the API prefix.
    pub fn api_url(&self, path: &str) -> String {
        let prefix = join_url(&self.base_url, &self.api_prefix);
        join_url(&prefix, path)
    }

    pub fn summarize_timeout(&self) -> Duration {
        Duration::from_secs(self.summarize_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        format!("{base}/")
    } else {
        format!("{base}/{path}")
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.api_prefix = prefix.into();
        self
    }

    pub fn summarize_timeout_secs(mut self, secs: u64) -> Self {
        self.config.summarize_timeout_secs = secs;
        self
    }

    pub fn probe_timeout_secs(mut self, secs: u64) -> Self {
        self.config.probe_timeout_secs = secs;
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    pub fn max_document_bytes(mut self, bytes: u64) -> Self {
        self.config.limits.max_document_bytes = bytes;
        self
    }

    pub fn max_text_chars(mut self, chars: usize) -> Self {
        self.config.limits.max_text_chars = chars;
        self
    }

    pub fn paste_indicator(mut self, duration: Duration) -> Self {
        self.config.paste_indicator = duration;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn SubmissionObserver>) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ClientError> {
        let c = &self.config;
        let parsed = reqwest::Url::parse(&c.base_url).map_err(|e| {
            ClientError::InvalidConfig(format!("base URL '{}' is invalid: {e}", c.base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if c.summarize_timeout_secs == 0 || c.probe_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "Timeouts must be ≥ 1 second".into(),
            ));
        }
        if c.limits.max_document_bytes == 0 || c.limits.max_text_chars == 0 {
            return Err(ClientError::InvalidConfig(
                "Input limits must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Local constraints applied to user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLimits {
    /// Maximum document size in bytes. Default: 10 MiB.
    pub max_document_bytes: u64,
    /// Maximum free-text length in characters. Default: 5000.
    pub max_text_chars: usize,
    /// Accepted document MIME type. Default: `application/pdf`.
    pub accepted_mime_type: String,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_document_bytes: 10 * 1024 * 1024,
            max_text_chars: 5000,
            accepted_mime_type: PDF_MIME_TYPE.to_string(),
        }
    }
}

impl InputLimits {
    /// MIME types compare case-insensitively.
    pub fn accepts_mime_type(&self, mime_type: &str) -> bool {
        mime_type.eq_ignore_ascii_case(&self.accepted_mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let c = ClientConfig::default();
        assert_eq!(c.summarize_timeout(), Duration::from_secs(30));
        assert_eq!(c.probe_timeout(), Duration::from_secs(5));
        assert_eq!(c.limits.max_document_bytes, 10_485_760);
        assert_eq!(c.limits.max_text_chars, 5000);
        assert_eq!(c.limits.accepted_mime_type, "application/pdf");
    }

    #[test]
    fn mime_type_match_ignores_case() {
        let limits = InputLimits {
            accepted_mime_type: "Application/PDF".to_string(),
            ..InputLimits::default()
        };
        assert!(limits.accepts_mime_type("application/pdf"));
        assert!(limits.accepts_mime_type("APPLICATION/PDF"));
        assert!(!limits.accepts_mime_type("text/plain"));
    }

    #[test]
    fn url_joining() {
        let c = ClientConfig::builder()
            .base_url("http://example.test:8000/")
            .build()
            .unwrap();
        assert_eq!(c.root_url("/"), "http://example.test:8000/");
        assert_eq!(c.root_url("/health"), "http://example.test:8000/health");
        assert_eq!(
            c.api_url("/summarize/pdf"),
            "http://example.test:8000/api/summarize/pdf"
        );
    }

    #[test]
    fn custom_api_prefix() {
        let c = ClientConfig::builder()
            .base_url("http://example.test")
            .api_prefix("v2/")
            .build()
            .unwrap();
        assert_eq!(c.api_url("summaries"), "http://example.test/v2/summaries");
    }

    #[test]
    fn rejects_bad_base_url() {
        let err = ClientConfig::builder().base_url("not a url").build();
        assert!(matches!(err, Err(ClientError::InvalidConfig(_))));

        let err = ClientConfig::builder().base_url("ftp://example.test").build();
        assert!(matches!(err, Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = ClientConfig::builder().probe_timeout_secs(0).build();
        assert!(matches!(err, Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn debug_hides_observer() {
        let c = ClientConfig::builder()
            .observer(Arc::new(crate::progress::NoopObserver))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn SubmissionObserver>"), "got: {dbg}");
    }
}
