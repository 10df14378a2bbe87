//! Busy signal for remote operations
//!
//! Every remote call holds a [`LoadingGuard`] for its whole duration. The
//! gate counts live guards, so two overlapping calls keep the busy flag set
//! until the second one finishes, and records the last outcome of each
//! [`Operation`] for presentation layers that want per-operation status.
//!
//! The gate signals; it does not serialize. Nothing stops a second call from
//! starting while the first is still in flight.

use parking_lot::Mutex;
use shared::Operation;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Last known state of one kind of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Default)]
struct GateState {
    busy: usize,
    /// Pending count and last outcome per operation
    statuses: HashMap<Operation, (usize, OperationStatus)>,
}

#[derive(Debug)]
struct GateInner {
    /// The busy count and the signal only change together, under this lock
    state: Mutex<GateState>,
    signal: watch::Sender<bool>,
}

/// Shared, cloneable busy counter
#[derive(Debug, Clone)]
pub struct LoadingGate {
    inner: Arc<GateInner>,
}

impl Default for LoadingGate {
    fn default() -> Self {
        LoadingGate::new()
    }
}

impl LoadingGate {
    pub fn new() -> Self {
        let (signal, _) = watch::channel(false);
        LoadingGate {
            inner: Arc::new(GateInner {
                state: Mutex::new(GateState::default()),
                signal,
            }),
        }
    }

    /// Mark `operation` as started; released when the guard drops
    pub fn hold(&self, operation: Operation) -> LoadingGuard {
        let mut state = self.inner.state.lock();
        let entry = state
            .statuses
            .entry(operation)
            .or_insert((0, OperationStatus::Idle));
        entry.0 += 1;
        entry.1 = OperationStatus::Pending;
        state.busy += 1;
        if state.busy == 1 {
            self.inner.signal.send_replace(true);
        }
        drop(state);

        LoadingGuard {
            gate: self.clone(),
            operation,
            succeeded: false,
        }
    }

    /// True while at least one guard is alive
    pub fn is_busy(&self) -> bool {
        self.inner.state.lock().busy > 0
    }

    /// Number of operations currently in flight
    pub fn in_flight(&self) -> usize {
        self.inner.state.lock().busy
    }

    pub fn status(&self, operation: Operation) -> OperationStatus {
        self.inner
            .state
            .lock()
            .statuses
            .get(&operation)
            .map(|(_, status)| *status)
            .unwrap_or_default()
    }

    /// Watch busy transitions (`true` on the first hold, `false` when the
    /// last guard is released)
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.signal.subscribe()
    }

    fn release(&self, operation: Operation, succeeded: bool) {
        let mut state = self.inner.state.lock();
        if let Some(entry) = state.statuses.get_mut(&operation) {
            entry.0 = entry.0.saturating_sub(1);
            entry.1 = match (entry.0, succeeded) {
                (0, true) => OperationStatus::Succeeded,
                (0, false) => OperationStatus::Failed,
                _ => OperationStatus::Pending,
            };
        }
        state.busy = state.busy.saturating_sub(1);
        if state.busy == 0 {
            self.inner.signal.send_replace(false);
        }
    }
}

/// Keeps the gate busy until dropped.
///
/// A guard dropped without [`LoadingGuard::succeed`] records a failure, so
/// early returns and panics still release the gate.
#[derive(Debug)]
#[must_use = "the gate is released as soon as the guard is dropped"]
pub struct LoadingGuard {
    gate: LoadingGate,
    operation: Operation,
    succeeded: bool,
}

impl LoadingGuard {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Release the gate recording success
    pub fn succeed(mut self) {
        self.succeeded = true;
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.gate.release(self.operation, self.succeeded);
    }
}
