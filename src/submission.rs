//! The submission state machine.
//!
//! ```text
//!            submit()
//!  Idle ───────────────▶ Validating ──(no input)──────────────▶ Failed
//!   ▲                       │
//!   │                       ▼
//!   │              AwaitingConnectivity ──(not Available)─────▶ Failed
//!   │                       │
//!   │                       ▼
//!   │                  Submitting ──(transport error)─────────▶ Failed
//!   │                       │
//!   │                       ▼
//!   └── (next submit) ── Succeeded / Failed
//! ```
//!
//! Validation and the connectivity gate are purely local: the connectivity
//! state is read as last recorded by the monitor, never re-probed here.
//! While an attempt is in progress every further `submit()` returns
//! [`SubmitOutcome::AlreadyInFlight`] without side effects. Nothing is
//! retried automatically.

use crate::connectivity::ConnectivityMonitor;
use crate::error::{ErrorKind, TransportError};
use crate::input::{InputMode, SubmissionInput};
use crate::progress::Observer;
use crate::summary::SummaryResult;
use crate::transport::{DocumentPayload, Request, TextPayload, Transport};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    AwaitingConnectivity,
    Submitting,
    Succeeded,
    Failed,
}

impl Phase {
    /// An attempt has started and not yet reached a terminal phase.
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            Phase::Validating | Phase::AwaitingConnectivity | Phase::Submitting
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::Validating => "validating",
            Phase::AwaitingConnectivity => "checking backend",
            Phase::Submitting => "submitting",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Why an attempt failed. Exactly one is stored per failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFailure {
    pub kind: ErrorKind,
    /// Server-provided or diagnostic detail, when there is one.
    pub detail: Option<String>,
}

impl SubmissionFailure {
    pub fn local(kind: ErrorKind) -> Self {
        Self { kind, detail: None }
    }

    fn local_with(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: Some(detail.into()),
        }
    }

    /// User-facing message, with the detail appended when present.
    pub fn message(&self) -> String {
        match self.detail {
            Some(ref d) => format!("{} ({d})", self.kind.user_message()),
            None => self.kind.user_message().to_string(),
        }
    }
}

impl From<TransportError> for SubmissionFailure {
    fn from(e: TransportError) -> Self {
        let detail = match e {
            TransportError::Timeout { .. } => Some(e.to_string()),
            _ => e.detail().map(str::to_string),
        };
        Self {
            kind: e.kind(),
            detail,
        }
    }
}

/// Serialises as `{"kind", "message", "detail"}` for machine-readable output.
impl Serialize for SubmissionFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SubmissionFailure", 3)?;
        s.serialize_field("kind", &self.kind)?;
        s.serialize_field("message", self.kind.user_message())?;
        s.serialize_field("detail", &self.detail)?;
        s.end()
    }
}

impl fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Snapshot of the orchestrator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmissionState {
    pub phase: Phase,
    pub failure: Option<SubmissionFailure>,
    pub result: Option<SummaryResult>,
}

/// What a call to [`SubmissionOrchestrator::submit`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Succeeded(SummaryResult),
    Failed(SubmissionFailure),
    /// Another attempt was in progress; nothing happened.
    AlreadyInFlight,
}

impl SubmitOutcome {
    pub fn into_result(self) -> Option<Result<SummaryResult, SubmissionFailure>> {
        match self {
            SubmitOutcome::Succeeded(r) => Some(Ok(r)),
            SubmitOutcome::Failed(f) => Some(Err(f)),
            SubmitOutcome::AlreadyInFlight => None,
        }
    }
}

/// Owns the single live [`SubmissionState`] of a client.
pub struct SubmissionOrchestrator {
    transport: Arc<dyn Transport>,
    connectivity: Arc<ConnectivityMonitor>,
    observer: Option<Observer>,
    state: Mutex<SubmissionState>,
}

impl SubmissionOrchestrator {
    pub fn new(
        transport: Arc<dyn Transport>,
        connectivity: Arc<ConnectivityMonitor>,
        observer: Option<Observer>,
    ) -> Self {
        Self {
            transport,
            connectivity,
            observer,
            state: Mutex::new(SubmissionState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().clone()
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Run one submission attempt for `input`.
    pub async fn submit(&self, input: &SubmissionInput) -> SubmitOutcome {
        // Admission and the reset of the previous result happen under one lock.
        let from = {
            let mut state = self.lock();
            if state.phase.is_in_progress() {
                debug!("submit() ignored: attempt already {}", state.phase);
                return SubmitOutcome::AlreadyInFlight;
            }
            let from = state.phase;
            *state = SubmissionState {
                phase: Phase::Validating,
                failure: None,
                result: None,
            };
            from
        };
        self.notify_phase(from, Phase::Validating);

        let request = match build_request(input) {
            Ok(request) => request,
            Err(failure) => return self.fail(failure),
        };

        self.advance(Phase::AwaitingConnectivity);
        let connectivity = self.connectivity.current();
        if !connectivity.is_available() {
            let failure = match connectivity.last_error {
                Some(ref e) => SubmissionFailure::local_with(ErrorKind::BackendUnavailable, e.to_string()),
                None => SubmissionFailure::local(ErrorKind::BackendUnavailable),
            };
            return self.fail(failure);
        }

        self.advance(Phase::Submitting);
        let kind = request.kind();
        info!("Submitting {}", kind);
        if let Some(ref o) = self.observer {
            o.on_request_start(kind);
        }

        let start = Instant::now();
        let outcome = self
            .transport
            .send(request)
            .await
            .and_then(|raw| SummaryResult::from_response(&raw));

        match outcome {
            Ok(result) => {
                info!(
                    "Summary '{}' received: {} words, {}ms",
                    result.title,
                    result.word_count,
                    start.elapsed().as_millis()
                );
                self.succeed(result)
            }
            Err(e) => self.fail(e.into()),
        }
    }

    fn advance(&self, to: Phase) {
        let from = {
            let mut state = self.lock();
            std::mem::replace(&mut state.phase, to)
        };
        self.notify_phase(from, to);
    }

    fn succeed(&self, result: SummaryResult) -> SubmitOutcome {
        let from = {
            let mut state = self.lock();
            state.result = Some(result.clone());
            std::mem::replace(&mut state.phase, Phase::Succeeded)
        };
        self.notify_phase(from, Phase::Succeeded);
        if let Some(ref o) = self.observer {
            o.on_success(&result);
        }
        SubmitOutcome::Succeeded(result)
    }

    fn fail(&self, failure: SubmissionFailure) -> SubmitOutcome {
        warn!("Submission failed: {:?} {}", failure.kind, failure.detail.as_deref().unwrap_or(""));
        let from = {
            let mut state = self.lock();
            state.failure = Some(failure.clone());
            std::mem::replace(&mut state.phase, Phase::Failed)
        };
        self.notify_phase(from, Phase::Failed);
        if let Some(ref o) = self.observer {
            o.on_failure(&failure);
        }
        SubmitOutcome::Failed(failure)
    }

    fn notify_phase(&self, from: Phase, to: Phase) {
        debug!("Submission phase: {} → {}", from, to);
        if let Some(ref o) = self.observer {
            o.on_phase_change(from, to);
        }
    }
}

/// Turn the input into a request for the active mode.
///
/// Size and type were enforced when the document was selected, so the only
/// local failure left is missing input.
fn build_request(input: &SubmissionInput) -> Result<Request, SubmissionFailure> {
    let additional_context = input.notes().non_blank().map(str::to_string);
    let title = input.title().map(str::to_string);

    match input.mode() {
        InputMode::UploadDocument => {
            let document = input.document().ok_or_else(|| {
                SubmissionFailure::local_with(ErrorKind::MissingInput, "no document selected")
            })?;
            Ok(Request::SummarizeDocument(DocumentPayload {
                document: document.clone(),
                additional_context,
                title,
            }))
        }
        InputMode::PasteText => {
            let text = input.text().non_blank().ok_or_else(|| {
                SubmissionFailure::local_with(ErrorKind::MissingInput, "text is empty")
            })?;
            Ok(Request::SummarizeText(TextPayload {
                text: text.to_string(),
                additional_context,
                title,
            }))
        }
    }
}
