//! # summariq-client
//!
//! Client for a document/text summarization service: submit a PDF or a block
//! of pasted text, get back a titled summary with word count and timing.
//!
//! ## Why this crate?
//!
//! The service itself is a thin HTTP API. What a front end actually needs is
//! the part around it: a reachability check before anything is sent, local
//! validation so empty or oversized input never leaves the machine, a single
//! in-flight submission at a time, and failures mapped to a small set of
//! user-facing categories instead of raw HTTP codes. This crate is that part,
//! usable from a CLI, a GUI, or a test harness alike.
//!
//! ## Flow
//!
//! ```text
//! SubmissionInput
//!  │
//!  ├─ 1. Validate      document selected / text non-blank (local)
//!  ├─ 2. Gate          last connectivity probe said Available (local)
//!  ├─ 3. Transport     exactly one POST, multipart or JSON
//!  ├─ 4. Decode        canonical success-flag response → SummaryResult
//!  └─ 5. Format        heading, body, metadata trailer
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use summariq_client::{format_summary, ClientConfig, SubmitOutcome, SummarizerClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SummarizerClient::new(ClientConfig::default())?;
//!     client.start().await;
//!
//!     let mut input = client.new_input();
//!     input.select_document_path("report.pdf").await?;
//!     input.set_notes("Focus on the revenue figures")?;
//!
//!     if let SubmitOutcome::Succeeded(summary) = client.submit(&input).await {
//!         println!("{}", format_summary(&summary));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `summariq` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! summariq-client = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod format;
pub mod input;
pub mod progress;
pub mod submission;
pub mod summary;
pub mod transport;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{write_summary, SummarizerClient};
pub use config::{ClientConfig, ClientConfigBuilder, InputLimits, PDF_MIME_TYPE};
pub use connectivity::{ConnectivityMonitor, ConnectivityState, ConnectivityStatus};
pub use error::{ClientError, ErrorKind, InputError, TransportError};
pub use format::format_summary;
pub use input::{Expiring, FreeText, InputMode, SubmissionInput, UploadedDocument};
pub use progress::{NoopObserver, Observer, SubmissionObserver};
pub use submission::{
    Phase, SubmissionFailure, SubmissionOrchestrator, SubmissionState, SubmitOutcome,
};
pub use summary::{HealthStatus, HistoryEntry, SummaryRecord, SummaryResult};
pub use transport::{HttpTransport, RawResponse, Request, RequestKind, Transport};
