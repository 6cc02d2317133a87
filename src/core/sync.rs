//! Interruptible blocking primitives shared by the dealer and players.
//!
//! Every wait in the engine is bounded so a termination request is seen
//! within one poll interval. `Signal` is a one-shot latch that doubles as
//! an interruptible sleep; `Gate` holds player input back while the
//! dealer rewrites the table in bulk.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Lock a mutex, recovering the data if another thread panicked with it held.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One-shot latch. Once fired it stays fired.
#[derive(Debug, Default)]
pub struct Signal {
    fired: Mutex<bool>,
    cv: Condvar,
}

impl Signal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the latch and wake every waiter.
    pub fn fire(&self) {
        *lock(&self.fired) = true;
        self.cv.notify_all();
    }

    #[must_use]
    pub fn is_fired(&self) -> bool {
        *lock(&self.fired)
    }

    /// Sleep for up to `timeout`. Returns `true` if the latch fired.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = lock(&self.fired);
        let (guard, _) = self
            .cv
            .wait_timeout_while(guard, timeout, |fired| !*fired)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

#[derive(Debug, Default)]
struct GateState {
    closed: bool,
    passing: usize,
}

/// Barrier closed by the dealer during deal and reset phases.
///
/// Input holds a `GatePass` for the duration of one table or queue
/// update. `close` waits for every outstanding pass to drop, so once it
/// returns no press can land until `open`.
#[derive(Debug, Default)]
pub struct Gate {
    state: Mutex<GateState>,
    cv: Condvar,
}

/// Proof that the gate was open; the dealer cannot close it while held.
#[derive(Debug)]
#[must_use = "the gate only stays open while the pass is held"]
pub struct GatePass<'a> {
    gate: &'a Gate,
}

impl Drop for GatePass<'_> {
    fn drop(&mut self) {
        let mut state = lock(&self.gate.state);
        state.passing -= 1;
        if state.passing == 0 {
            drop(state);
            self.gate.cv.notify_all();
        }
    }
}

impl Gate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the gate and wait until no pass is outstanding.
    ///
    /// Pass holders never block, so the drain is short.
    pub fn close(&self) {
        let mut state = lock(&self.state);
        state.closed = true;
        let _drained = self
            .cv
            .wait_while(state, |s| s.passing > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    pub fn open(&self) {
        lock(&self.state).closed = false;
        self.cv.notify_all();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }

    /// Wait up to `timeout` for the gate to open. Returns `true` if open.
    pub fn wait_open(&self, timeout: Duration) -> bool {
        let guard = lock(&self.state);
        let (guard, _) = self
            .cv
            .wait_timeout_while(guard, timeout, |s| s.closed)
            .unwrap_or_else(PoisonError::into_inner);
        !guard.closed
    }

    /// Block until the gate opens or `stop` fires, then hold it open.
    pub fn enter(&self, stop: &Signal, poll: Duration) -> Option<GatePass<'_>> {
        loop {
            if stop.is_fired() {
                return None;
            }
            let guard = lock(&self.state);
            let (mut guard, _) = self
                .cv
                .wait_timeout_while(guard, poll, |s| s.closed)
                .unwrap_or_else(PoisonError::into_inner);
            if !guard.closed {
                guard.passing += 1;
                return Some(GatePass { gate: self });
            }
        }
    }
}
