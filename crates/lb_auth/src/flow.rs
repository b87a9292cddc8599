//! Login and registration submission flows.
//!
//! One [`SubmitFlow`] per dialog. A submission walks
//! `Idle → Submitting → {Success, Failure, TimedOut, Errored}`, and a
//! successful one moves on to `Closing` after a short, user-visible delay
//! (1 s for login, 2 s for registration). The submit control is disabled for
//! the whole race and re-enabled afterwards no matter how it resolved.

use std::future::Future;
use std::time::Duration;

use crate::ValidationError;
use lb_core::timed::{self, RemoteError, RemoteOutcome};

pub const LOGIN_CLOSE_DELAY: Duration = Duration::from_secs(1);
pub const REGISTER_CLOSE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Submitting,
    Success,
    Failure,
    TimedOut,
    Errored,
    /// Terminal: the dialog is on its way out.
    Closing,
}

#[derive(Debug)]
pub struct SubmitFlow {
    state: FlowState,
    status: String,
    submit_enabled: bool,
    timeout: Duration,
    close_delay: Duration,
}

impl SubmitFlow {
    pub fn login() -> Self {
        Self::with_timing(timed::REMOTE_TIMEOUT, LOGIN_CLOSE_DELAY)
    }

    pub fn register() -> Self {
        Self::with_timing(timed::REMOTE_TIMEOUT, REGISTER_CLOSE_DELAY)
    }

    pub fn with_timing(timeout: Duration, close_delay: Duration) -> Self {
        Self {
            state: FlowState::Idle,
            status: String::new(),
            submit_enabled: true,
            timeout,
            close_delay,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Current status line. Updated exactly once per resolution.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    /// A validation failure: shown in the status line, but the flow never
    /// leaves `Idle` and no race is started.
    pub fn reject(&mut self, error: &ValidationError) {
        self.status = error.to_string();
    }

    /// Race `op` against the timeout and resolve this submission.
    ///
    /// Re-entrant calls while a race is in flight are ignored; the control
    /// is disabled, so a second submit shouldn't be possible anyway.
    pub async fn submit<F>(&mut self, op: F) -> FlowState
    where
        F: Future<Output = Result<(bool, String), RemoteError>> + Send + 'static,
    {
        if self.state == FlowState::Submitting {
            return self.state;
        }
        self.state = FlowState::Submitting;
        self.submit_enabled = false;

        let outcome = timed::race(op, self.timeout).await;

        // Re-enabled whatever happened; the success path only closes the
        // dialog after its delay, and the control stays usable until then.
        self.submit_enabled = true;

        match outcome {
            RemoteOutcome::Success(message) => {
                self.status = message;
                self.state = FlowState::Success;
            }
            RemoteOutcome::Failure(message) => {
                self.status = message;
                self.state = FlowState::Failure;
            }
            RemoteOutcome::Timeout => {
                self.status = "The request timed out. Try again later.".to_owned();
                self.state = FlowState::TimedOut;
            }
            RemoteOutcome::Errored(fault) => {
                self.status = fault.message;
                self.state = FlowState::Errored;
            }
        }
        self.state
    }

    /// After a success, wait out the user-visible delay and move to
    /// `Closing`. Returns whether the dialog should now close.
    pub async fn finish(&mut self) -> bool {
        if self.state != FlowState::Success {
            return false;
        }
        tokio::time::sleep(self.close_delay).await;
        self.state = FlowState::Closing;
        true
    }
}
