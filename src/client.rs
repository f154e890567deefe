//! Public facade: one [`SummarizerClient`] per backend.
//!
//! The client owns the transport, the connectivity monitor and the
//! submission orchestrator, and wires the configured observer into both.
//! Summaries go through [`SummarizerClient::submit`]; the auxiliary calls
//! (`health`, `list_summaries`, `history`, `clear_history`) are plain
//! request/response wrappers that surface [`ClientError`] directly.

use crate::config::ClientConfig;
use crate::connectivity::{ConnectivityMonitor, ConnectivityState};
use crate::error::ClientError;
use crate::input::SubmissionInput;
use crate::submission::{SubmissionOrchestrator, SubmissionState, SubmitOutcome};
use crate::summary::{HealthStatus, HistoryEntry, HistoryResponse, MessageResponse, SummaryList, SummaryRecord};
use crate::transport::{HttpTransport, Request, Transport};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Client for the summarization service.
///
/// ```rust,no_run
/// use summariq_client::{ClientConfig, InputMode, SubmitOutcome, SummarizerClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = SummarizerClient::new(ClientConfig::default())?;
///     client.start().await;
///
///     let mut input = client.new_input();
///     input.set_mode(InputMode::PasteText);
///     input.set_text("Quarterly revenue grew 12% on strong cloud demand...")?;
///
///     match client.submit(&input).await {
///         SubmitOutcome::Succeeded(summary) => println!("{summary}"),
///         SubmitOutcome::Failed(failure) => eprintln!("{failure}"),
///         SubmitOutcome::AlreadyInFlight => {}
///     }
///     Ok(())
/// }
/// ```
pub struct SummarizerClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    connectivity: Arc<ConnectivityMonitor>,
    orchestrator: SubmissionOrchestrator,
}

impl SummarizerClient {
    /// Build a client that talks HTTP to `config.base_url`.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Build a client over any [`Transport`], e.g. a scripted one in tests.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let observer = config.observer.clone();
        let connectivity = Arc::new(ConnectivityMonitor::new(
            Arc::clone(&transport),
            observer.clone(),
        ));
        let orchestrator =
            SubmissionOrchestrator::new(Arc::clone(&transport), Arc::clone(&connectivity), observer);
        Self {
            config,
            transport,
            connectivity,
            orchestrator,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Empty input bound to this client's limits.
    pub fn new_input(&self) -> SubmissionInput {
        SubmissionInput::new(&self.config)
    }

    /// Run the initial connectivity probe. Call once when the client starts.
    pub async fn start(&self) -> ConnectivityState {
        info!("Starting client for {}", self.config.base_url);
        self.connectivity.check_now().await
    }

    /// Re-probe the backend on demand.
    pub async fn check_connectivity(&self) -> ConnectivityState {
        self.connectivity.check_now().await
    }

    /// Last recorded connectivity. Never touches the network.
    pub fn connectivity(&self) -> ConnectivityState {
        self.connectivity.current()
    }

    /// Run one submission attempt. See [`SubmissionOrchestrator::submit`].
    pub async fn submit(&self, input: &SubmissionInput) -> SubmitOutcome {
        self.orchestrator.submit(input).await
    }

    pub fn state(&self) -> SubmissionState {
        self.orchestrator.state()
    }

    /// `GET /health` on the service root.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let raw = self.transport.send(Request::Health).await?;
        Ok(raw.json()?)
    }

    /// Summaries previously generated by the service.
    pub async fn list_summaries(&self) -> Result<Vec<SummaryRecord>, ClientError> {
        let raw = self.transport.send(Request::ListSummaries).await?;
        let list: SummaryList = raw.json()?;
        let records = list.into_records();
        debug!("Listed {} stored summaries", records.len());
        Ok(records)
    }

    /// The service-side conversation history.
    pub async fn history(&self) -> Result<Vec<HistoryEntry>, ClientError> {
        let raw = self.transport.send(Request::History).await?;
        let response: HistoryResponse = raw.json()?;
        Ok(response.history)
    }

    /// Clear the service-side history; returns the service's message.
    pub async fn clear_history(&self) -> Result<String, ClientError> {
        let raw = self.transport.send(Request::ClearHistory).await?;
        let response: MessageResponse = raw.json()?;
        info!("History cleared: {}", response.message);
        Ok(response.message)
    }
}

/// Write `contents` to `path` atomically: temp file in the same directory,
/// then rename. Parent directories are created as needed.
pub async fn write_summary(path: impl AsRef<Path>, contents: &str) -> Result<(), ClientError> {
    let path = path.as_ref();
    let write_err = |e: std::io::Error| ClientError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::RawResponse;
    use std::sync::Mutex;

    /// Answers every request from a fixed table and records what was sent.
    struct Canned {
        sent: Mutex<Vec<crate::transport::RequestKind>>,
    }

    #[async_trait::async_trait]
    impl Transport for Canned {
        async fn send(&self, request: Request) -> Result<RawResponse, TransportError> {
            self.sent.lock().unwrap().push(request.kind());
            let body = match request {
                Request::Probe => r#"{"message":"Welcome to SummarIQ API"}"#,
                Request::Health => r#"{"status":"healthy","message":"SummarIQ API is running"}"#,
                Request::ListSummaries => {
                    r#"{"summaries":[{"filename":"a_summary.txt","created_at":1.5,"size":9}]}"#
                }
                Request::History => {
                    r#"{"history":[{"role":"user","content":"hi"},{"role":"assistant","content":"hello"}]}"#
                }
                Request::ClearHistory => r#"{"message":"Conversation history cleared"}"#,
                Request::SummarizeText(_) | Request::SummarizeDocument(_) => {
                    r#"{"success":true,"title":"T","summary":"S"}"#
                }
            };
            Ok(RawResponse::new(200, body))
        }
    }

    fn client() -> (SummarizerClient, Arc<Canned>) {
        let transport = Arc::new(Canned {
            sent: Mutex::new(Vec::new()),
        });
        let client = SummarizerClient::with_transport(ClientConfig::default(), transport.clone());
        (client, transport)
    }

    #[tokio::test]
    async fn start_probes_once() {
        let (client, transport) = client();
        assert!(!client.connectivity().is_available());
        let state = client.start().await;
        assert!(state.is_available());
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn auxiliary_calls_decode() {
        let (client, _) = client();
        assert!(client.health().await.unwrap().is_healthy());
        let records = client.list_summaries().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].filename, "a_summary.txt");
        let history = client.history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].role, "assistant");
        assert_eq!(
            client.clear_history().await.unwrap(),
            "Conversation history cleared"
        );
    }

    #[tokio::test]
    async fn write_summary_creates_parents_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/summary.md");
        write_summary(&path, "# T\n").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# T\n");
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn write_summary_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is needed.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let err = write_summary(blocker.join("out.md"), "x").await.unwrap_err();
        assert!(matches!(err, ClientError::OutputWriteFailed { .. }));
    }
}
