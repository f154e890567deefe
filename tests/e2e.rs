//! End-to-end tests for summariq-client over real HTTP.
//!
//! Each test starts a `wiremock` server standing in for the summarization
//! service, points a client at it and checks both what the client sent and
//! how it interpreted the answer.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture

use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use summariq_client::{
    format_summary, ClientConfig, ClientError, ConnectivityStatus, ErrorKind, InputMode,
    SubmitOutcome, SummarizerClient, SummaryRecord, TransportError, UploadedDocument, PDF_MIME_TYPE,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Test helpers ─────────────────────────────────────────────────────────────

async fn mount_probe(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Welcome to SummarIQ API"})),
        )
        .mount(server)
        .await;
}

async fn started_client(server: &MockServer) -> SummarizerClient {
    started_client_with(server, |b| b).await
}

async fn started_client_with(
    server: &MockServer,
    configure: impl FnOnce(summariq_client::ClientConfigBuilder) -> summariq_client::ClientConfigBuilder,
) -> SummarizerClient {
    let config = configure(ClientConfig::builder().base_url(server.uri()))
        .build()
        .unwrap();
    let client = SummarizerClient::new(config).unwrap();
    let state = client.start().await;
    assert!(state.is_available(), "probe failed: {:?}", state.last_error);
    client
}

fn summary_body() -> serde_json::Value {
    json!({
        "success": true,
        "title": "Report",
        "summary": "Revenue grew twelve percent.",
        "word_count": 120,
        "processing_time": 1.2,
        "message": "Summary generated successfully",
        "saved_path": "summaries/report.md"
    })
}

async fn submit_text(client: &SummarizerClient, text: &str) -> SubmitOutcome {
    let mut input = client.new_input();
    input.set_mode(InputMode::PasteText);
    input.set_text(text).unwrap();
    client.submit(&input).await
}

fn expect_failure(outcome: SubmitOutcome) -> summariq_client::SubmissionFailure {
    match outcome {
        SubmitOutcome::Failed(f) => f,
        other => panic!("expected failure, got {other:?}"),
    }
}

// ── Connectivity ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_probe_marks_backend_available() {
    let server = MockServer::start().await;
    mount_probe(&server).await;

    let client = SummarizerClient::new(ClientConfig::builder().base_url(server.uri()).build().unwrap())
        .unwrap();
    assert_eq!(client.connectivity().status, ConnectivityStatus::Unknown);

    let state = client.start().await;
    assert_eq!(state.status, ConnectivityStatus::Available);
    assert!(state.last_checked_at.is_some());
}

#[tokio::test]
async fn test_probe_error_status_marks_backend_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = SummarizerClient::new(ClientConfig::builder().base_url(server.uri()).build().unwrap())
        .unwrap();
    let state = client.start().await;
    assert_eq!(state.status, ConnectivityStatus::Unavailable);
    assert_eq!(state.last_error.map(|e| e.kind()), Some(ErrorKind::ServerError));
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Nothing listens on port 1.
    let config = ClientConfig::builder()
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();
    let client = SummarizerClient::new(config).unwrap();

    let state = client.start().await;
    assert_eq!(state.status, ConnectivityStatus::Unavailable);
    assert_eq!(
        state.last_error.as_ref().map(TransportError::kind),
        Some(ErrorKind::NetworkUnreachable)
    );

    let failure = expect_failure(submit_text(&client, "Some article").await);
    assert_eq!(failure.kind, ErrorKind::BackendUnavailable);
}

// ── Summarize ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_text_summary_round_trip() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/summarize/text"))
        .and(body_json(json!({
            "text": "Long article text",
            "additional_context": "For executives"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = started_client(&server).await;
    let mut input = client.new_input();
    input.set_mode(InputMode::PasteText);
    input.set_text("Long article text").unwrap();
    input.set_notes("For executives").unwrap();

    let result = match client.submit(&input).await {
        SubmitOutcome::Succeeded(r) => r,
        other => panic!("expected success, got {other:?}"),
    };
    assert_eq!(result.title, "Report");
    assert_eq!(result.word_count, 120);
    assert_eq!(result.storage_path.as_deref(), Some("summaries/report.md"));

    assert_eq!(
        format_summary(&result),
        "# Report\n\
\n\
Revenue grew twelve percent.\n\
\n\
---\n\
Words: 120\n\
Processing time: 1.20s\n\
Saved to: summaries/report.md\n"
    );
}

#[tokio::test]
async fn test_document_upload_is_multipart() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    let mut body = summary_body();
    body["original_filename"] = json!("report.pdf");
    Mock::given(method("POST"))
        .and(path("/api/summarize/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let client = started_client(&server).await;
    let mut input = client.new_input();
    let doc = UploadedDocument::new(
        "report.pdf",
        PDF_MIME_TYPE,
        b"%PDF-1.4\n% tiny test document\n".to_vec(),
        input.limits(),
    )
    .unwrap();
    input.select_document(doc).unwrap();
    input.set_notes("focus on revenue").unwrap();
    input.set_title(Some("Q3".into()));

    let result = match client.submit(&input).await {
        SubmitOutcome::Succeeded(r) => r,
        other => panic!("expected success, got {other:?}"),
    };
    assert_eq!(result.source_file_name.as_deref(), Some("report.pdf"));

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.url.path() == "/api/summarize/pdf")
        .unwrap();
    let content_type = upload
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"), "got {content_type}");

    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains(r#"name="file"; filename="report.pdf""#), "{body}");
    assert!(
        body.to_ascii_lowercase().contains("content-type: application/pdf"),
        "{body}"
    );
    assert!(body.contains("%PDF-1.4"), "{body}");
    assert!(body.contains(r#"name="additional_context""#), "{body}");
    assert!(body.contains("focus on revenue"), "{body}");
    assert!(body.contains(r#"name="title""#), "{body}");
}

// ── Failure mapping ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_422_is_invalid_request_with_detail() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/summarize/text"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["body", "text"], "msg": "field required", "type": "value_error.missing"}]
        })))
        .mount(&server)
        .await;

    let client = started_client(&server).await;
    let failure = expect_failure(submit_text(&client, "Some article").await);
    assert_eq!(failure.kind, ErrorKind::InvalidRequest);
    assert!(failure.detail.unwrap().contains("field required"));
}

#[tokio::test]
async fn test_400_detail_is_passed_through() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/summarize/pdf"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Only PDF files are allowed"})),
        )
        .mount(&server)
        .await;

    let client = started_client(&server).await;
    let mut input = client.new_input();
    let doc = UploadedDocument::new("a.pdf", PDF_MIME_TYPE, b"%PDF-1.4".to_vec(), input.limits())
        .unwrap();
    input.select_document(doc).unwrap();

    let failure = expect_failure(client.submit(&input).await);
    assert_eq!(failure.kind, ErrorKind::InvalidRequest);
    assert_eq!(failure.detail.as_deref(), Some("Only PDF files are allowed"));
}

#[tokio::test]
async fn test_500_is_server_error() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/summarize/text"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"detail": "Error generating summary: quota exceeded"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = started_client(&server).await;
    let failure = expect_failure(submit_text(&client, "Some article").await);
    assert_eq!(failure.kind, ErrorKind::ServerError);
    assert_eq!(
        failure.detail.as_deref(),
        Some("Error generating summary: quota exceeded")
    );
}

#[tokio::test]
async fn test_unexpected_status_is_unknown() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    // No summarize mock: wiremock answers 404.

    let client = started_client(&server).await;
    let failure = expect_failure(submit_text(&client, "Some article").await);
    assert_eq!(failure.kind, ErrorKind::Unknown);
}

#[tokio::test]
async fn test_malformed_success_body_is_unknown() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/summarize/text"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy page</html>"))
        .mount(&server)
        .await;

    let client = started_client(&server).await;
    let failure = expect_failure(submit_text(&client, "Some article").await);
    assert_eq!(failure.kind, ErrorKind::Unknown);
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/summarize/text"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(summary_body())
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let client = started_client_with(&server, |b| b.summarize_timeout_secs(1)).await;
    let failure = expect_failure(submit_text(&client, "Some article").await);
    assert_eq!(failure.kind, ErrorKind::Timeout);
}

// ── Auxiliary endpoints ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_and_history_endpoints() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "healthy", "message": "SummarIQ API is running"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/summaries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summaries": [
                {"filename": "report_summary.txt", "created_at": 1700000000.5, "size": 812}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "history": [
                {"role": "user", "content": "Summarize this"},
                {"role": "assistant", "content": "Here is the summary"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/clear-history"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Conversation history cleared"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = started_client(&server).await;

    let health = client.health().await.unwrap();
    assert!(health.is_healthy());

    let records = client.list_summaries().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].filename, "report_summary.txt");

    let history = client.history().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, "Summarize this");

    assert_eq!(
        client.clear_history().await.unwrap(),
        "Conversation history cleared"
    );
}

#[tokio::test]
async fn test_list_summaries_reads_service_listing() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/summaries"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"summaries":[{"filename":"report_summary.txt","created_at":1700000000.5,"size":812}]}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = started_client(&server).await;
    let records = client.list_summaries().await.unwrap();

    assert_eq!(
        records,
        vec![SummaryRecord {
            filename: "report_summary.txt".to_string(),
            created_at: 1_700_000_000.5,
            size: 812,
        }]
    );
}

#[tokio::test]
async fn test_auxiliary_errors_surface_to_caller() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/summaries"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = started_client(&server).await;
    match client.list_summaries().await {
        Err(ClientError::Transport(e)) => {
            assert_eq!(e.kind(), ErrorKind::ServerError);
            assert_eq!(e.detail(), Some("boom"));
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}
