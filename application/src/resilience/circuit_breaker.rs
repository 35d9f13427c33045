//! Circuit breaker guarding one external dependency.
//!
//! # States
//! - Closed: operations run; consecutive failures are counted
//! - Open: operations are rejected without being attempted
//! - HalfOpen: a single trial operation is in flight
//!
//! # Transitions
//! ```text
//! Closed   → Open:     failure_count >= failure_threshold
//! Open     → HalfOpen: next call after open_timeout since the last failure
//! HalfOpen → Closed:   trial succeeds (failure_count reset)
//! HalfOpen → Open:     trial fails (failure_count stays >= threshold,
//!                      last_failure_at restarts the window)
//! ```
//!
//! The Open → HalfOpen transition is lazy: there is no background timer.
//! The breaker does not impose a deadline on the operation itself.
//!
//! Every check/increment/transition happens under one mutex, which is never
//! held across the awaited operation.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use refdesk_domain::resilience::{BreakerPolicy, BreakerSnapshot, BreakerState};

/// Failure of [`CircuitBreaker::execute`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BreakerError<E> {
    /// Rejected without attempting the operation
    #[error("Circuit '{name}' is open")]
    Open { name: String },

    /// The operation ran and failed; the failure has been recorded
    #[error("{0}")]
    Operation(E),
}

impl<E> BreakerError<E> {
    pub fn is_open(&self) -> bool {
        matches!(self, BreakerError::Open { .. })
    }
}

#[derive(Debug)]
struct BreakerInner {
    state: BreakerState,
    failure_count: u32,
    last_failure_at: Option<Instant>,
    trial_in_flight: bool,
}

/// Fail-fast guard for one dependency.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    policy: BreakerPolicy,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, policy: BreakerPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            inner: Mutex::new(BreakerInner {
                state: BreakerState::Closed,
                failure_count: 0,
                last_failure_at: None,
                trial_in_flight: false,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> BreakerPolicy {
        self.policy
    }

    /// Current state as last recorded. Does not perform the lazy
    /// Open → HalfOpen transition.
    pub fn state(&self) -> BreakerState {
        self.lock().state
    }

    /// Current consecutive failure count
    pub fn failures(&self) -> u32 {
        self.lock().failure_count
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        let inner = self.lock();
        BreakerSnapshot {
            name: self.name.clone(),
            state: inner.state,
            failures: inner.failure_count,
            failure_threshold: self.policy.failure_threshold,
            open_timeout_ms: self.policy.open_timeout.as_millis() as u64,
            since_last_failure_ms: inner
                .last_failure_at
                .map(|at| Instant::now().saturating_duration_since(at).as_millis() as u64),
        }
    }

    /// Run `operation` if the circuit allows it, recording the outcome.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut permit = self.acquire().ok_or_else(|| BreakerError::Open {
            name: self.name.clone(),
        })?;

        let outcome = operation().await;
        permit.completed = true;

        match outcome {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(e) => {
                self.record_failure();
                Err(BreakerError::Operation(e))
            }
        }
    }

    /// Decide whether an operation may run now.
    fn acquire(&self) -> Option<Permit<'_>> {
        let now = Instant::now();
        let mut inner = self.lock();

        match inner.state {
            BreakerState::Closed => Some(Permit::new(self, false)),
            BreakerState::Open => {
                let elapsed = inner
                    .last_failure_at
                    .map(|at| now.saturating_duration_since(at))
                    .unwrap_or(self.policy.open_timeout);
                if elapsed >= self.policy.open_timeout {
                    inner.state = BreakerState::HalfOpen;
                    inner.trial_in_flight = true;
                    info!(breaker = %self.name, "Circuit half-open, attempting trial call");
                    Some(Permit::new(self, true))
                } else {
                    debug!(breaker = %self.name, "Circuit open, rejecting call");
                    None
                }
            }
            BreakerState::HalfOpen => {
                if inner.trial_in_flight {
                    debug!(breaker = %self.name, "Trial call in flight, rejecting call");
                    None
                } else {
                    inner.trial_in_flight = true;
                    Some(Permit::new(self, true))
                }
            }
        }
    }

    fn record_success(&self) {
        let mut inner = self.lock();
        if inner.state != BreakerState::Closed {
            info!(breaker = %self.name, "Trial call succeeded, circuit closed");
        }
        inner.state = BreakerState::Closed;
        inner.failure_count = 0;
        inner.trial_in_flight = false;
    }

    fn record_failure(&self) {
        let mut inner = self.lock();
        inner.failure_count = inner.failure_count.saturating_add(1);
        inner.last_failure_at = Some(Instant::now());

        match inner.state {
            BreakerState::HalfOpen => {
                inner.state = BreakerState::Open;
                inner.trial_in_flight = false;
                warn!(
                    breaker = %self.name,
                    failures = inner.failure_count,
                    "Trial call failed, circuit re-opened"
                );
            }
            BreakerState::Closed if inner.failure_count >= self.policy.failure_threshold => {
                inner.state = BreakerState::Open;
                warn!(
                    breaker = %self.name,
                    failures = inner.failure_count,
                    threshold = self.policy.failure_threshold,
                    "Failure threshold reached, circuit opened"
                );
            }
            _ => {}
        }
    }

    /// A trial whose future was dropped before finishing gives the slot
    /// back, so the breaker cannot get stuck half-open.
    fn abandon_trial(&self) {
        let mut inner = self.lock();
        if inner.state == BreakerState::HalfOpen && inner.trial_in_flight {
            inner.state = BreakerState::Open;
            inner.trial_in_flight = false;
            debug!(breaker = %self.name, "Trial call cancelled");
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Permission to run one operation. On drop, an unfinished trial is
/// released and a panicking operation is recorded as a failure.
struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    completed: bool,
}

impl<'a> Permit<'a> {
    fn new(breaker: &'a CircuitBreaker, trial: bool) -> Self {
        Self {
            breaker,
            trial,
            completed: false,
        }
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        if std::thread::panicking() {
            // Unwinding out of the operation counts as a failure
            self.breaker.record_failure();
        } else if self.trial {
            self.breaker.abandon_trial();
        }
    }
}
