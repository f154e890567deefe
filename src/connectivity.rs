//! Backend reachability, tracked as a tri-state status.
//!
//! ## Ordering
//!
//! Probes are never queued or cancelled. Each [`ConnectivityMonitor::check_now`]
//! takes the next sequence number before it sends; when it completes, its
//! result is applied only if no newer probe has been issued since. A slow
//! probe that fails after a newer one succeeded therefore cannot flip the
//! status back to `Unavailable`.

use crate::error::TransportError;
use crate::progress::Observer;
use crate::transport::{Request, Transport};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityStatus {
    /// No probe has completed yet.
    #[default]
    Unknown,
    Available,
    Unavailable,
}

/// The last applied probe outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectivityState {
    pub status: ConnectivityStatus,
    pub last_checked_at: Option<Instant>,
    /// Why the last probe failed, for display.
    pub last_error: Option<TransportError>,
    /// Sequence number of the probe that produced this state; 0 before any.
    pub probe_seq: u64,
}

impl ConnectivityState {
    pub fn is_available(&self) -> bool {
        self.status == ConnectivityStatus::Available
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: ConnectivityState,
    issued: u64,
}

/// Probes the service root and remembers the latest result.
pub struct ConnectivityMonitor {
    transport: Arc<dyn Transport>,
    observer: Option<Observer>,
    inner: Mutex<Inner>,
}

impl ConnectivityMonitor {
    pub fn new(transport: Arc<dyn Transport>, observer: Option<Observer>) -> Self {
        Self {
            transport,
            observer,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Poisoning is ignored: every write replaces the state wholesale.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The last applied state. Never touches the network.
    pub fn current(&self) -> ConnectivityState {
        self.lock().state.clone()
    }

    /// Issue a probe now and return the resulting state.
    ///
    /// If a newer probe was issued while this one was in flight, this
    /// probe's outcome is discarded and the current state is returned.
    pub async fn check_now(&self) -> ConnectivityState {
        let seq = {
            let mut inner = self.lock();
            inner.issued += 1;
            inner.issued
        };
        debug!("Connectivity probe #{} issued", seq);
        if let Some(ref o) = self.observer {
            o.on_request_start(Request::Probe.kind());
        }

        let outcome = self.transport.send(Request::Probe).await;

        let applied = {
            let mut inner = self.lock();
            if seq < inner.issued || seq <= inner.state.probe_seq {
                debug!(
                    "Discarding stale probe #{} (latest issued #{})",
                    seq, inner.issued
                );
                return inner.state.clone();
            }
            inner.state = match outcome {
                Ok(_) => ConnectivityState {
                    status: ConnectivityStatus::Available,
                    last_checked_at: Some(Instant::now()),
                    last_error: None,
                    probe_seq: seq,
                },
                Err(e) => ConnectivityState {
                    status: ConnectivityStatus::Unavailable,
                    last_checked_at: Some(Instant::now()),
                    last_error: Some(e),
                    probe_seq: seq,
                },
            };
            inner.state.clone()
        };

        match applied.last_error {
            None => info!("Backend available (probe #{})", seq),
            Some(ref e) => warn!("Backend unavailable (probe #{}): {}", seq, e),
        }
        if let Some(ref o) = self.observer {
            o.on_connectivity_change(&applied);
        }
        applied
    }
}
