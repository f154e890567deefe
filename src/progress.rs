//! Observer trait for submission and connectivity events.
//!
//! Inject an [`Arc<dyn SubmissionObserver>`] via
//! [`crate::config::ClientConfigBuilder::observer`] to receive events as the
//! orchestrator moves through its phases. The CLI uses this to drive its
//! spinner; a GUI would forward the events to its view model.
//!
//! # Example
//!
//! ```rust
//! use summariq_client::{ClientConfig, Phase, SubmissionObserver};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct PhaseLog {
//!     phases: Mutex<Vec<Phase>>,
//! }
//!
//! impl SubmissionObserver for PhaseLog {
//!     fn on_phase_change(&self, _from: Phase, to: Phase) {
//!         self.phases.lock().unwrap().push(to);
//!     }
//! }
//!
//! let config = ClientConfig::builder()
//!     .observer(Arc::new(PhaseLog::default()) as Arc<dyn SubmissionObserver>)
//!     .build()
//!     .unwrap();
//! ```

use crate::connectivity::ConnectivityState;
use crate::submission::{Phase, SubmissionFailure};
use crate::summary::SummaryResult;
use crate::transport::RequestKind;
use std::sync::Arc;

/// Called by the orchestrator and connectivity monitor as state changes.
///
/// Implementations must be `Send + Sync`. All methods have default no-op
/// implementations so callers only override what they care about. Events are
/// delivered after the corresponding state change is visible, never while an
/// internal lock is held, so an observer may query the client.
pub trait SubmissionObserver: Send + Sync {
    /// The orchestrator moved from `from` to `to`.
    fn on_phase_change(&self, from: Phase, to: Phase) {
        let _ = (from, to);
    }

    /// A request of the given kind is about to be sent.
    fn on_request_start(&self, kind: RequestKind) {
        let _ = kind;
    }

    /// A submission completed with a summary.
    fn on_success(&self, result: &SummaryResult) {
        let _ = result;
    }

    /// A submission failed, locally or remotely.
    fn on_failure(&self, failure: &SubmissionFailure) {
        let _ = failure;
    }

    /// A connectivity probe result was applied.
    fn on_connectivity_change(&self, state: &ConnectivityState) {
        let _ = state;
    }
}

/// A no-op implementation for callers that don't need events.
pub struct NoopObserver;

impl SubmissionObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type Observer = Arc<dyn SubmissionObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        transitions: AtomicUsize,
        requests: AtomicUsize,
        failures: AtomicUsize,
    }

    impl SubmissionObserver for Counting {
        fn on_phase_change(&self, _from: Phase, _to: Phase) {
            self.transitions.fetch_add(1, Ordering::SeqCst);
        }

        fn on_request_start(&self, _kind: RequestKind) {
            self.requests.fetch_add(1, Ordering::SeqCst);
        }

        fn on_failure(&self, _failure: &SubmissionFailure) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let o = NoopObserver;
        o.on_phase_change(Phase::Idle, Phase::Validating);
        o.on_request_start(RequestKind::TextSummarize);
        o.on_failure(&SubmissionFailure::local(ErrorKind::MissingInput));
    }

    #[test]
    fn overridden_methods_receive_events() {
        let c = Counting::default();
        c.on_phase_change(Phase::Idle, Phase::Validating);
        c.on_phase_change(Phase::Validating, Phase::Failed);
        c.on_request_start(RequestKind::ConnectivityProbe);
        c.on_failure(&SubmissionFailure::local(ErrorKind::BackendUnavailable));

        assert_eq!(c.transitions.load(Ordering::SeqCst), 2);
        assert_eq!(c.requests.load(Ordering::SeqCst), 1);
        assert_eq!(c.failures.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_observer_works() {
        let o: Observer = Arc::new(NoopObserver);
        o.on_phase_change(Phase::Submitting, Phase::Succeeded);
    }
}
