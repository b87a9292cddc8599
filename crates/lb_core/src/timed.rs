//! Timed remote operations.
//!
//! Login and registration both wrap a remote call in the same race: the call
//! against a fixed timer, first to resolve wins. The losing branch of the
//! race is *not* cancelled: on timeout the spawned task keeps running
//! detached and its eventual result is dropped. The original application
//! behaved the same way, and callers only ever see one outcome.

use std::{future::Future, time::Duration};

use thiserror::Error;

/// Timeout used by both the login and registration call sites.
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(60);

/// What went wrong, when the remote call itself failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The server could not be reached at all.
    Transport,
    /// The task running the call was cancelled out from under us.
    Cancelled,
    /// Everything else.
    Other,
}

/// A failed remote call with a message fit for the status line.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RemoteFault {
    pub kind: FaultKind,
    pub message: String,
}

impl RemoteFault {
    fn transport(detail: &str) -> Self {
        Self {
            kind: FaultKind::Transport,
            message: format!("Could not reach the server: {detail}"),
        }
    }

    fn cancelled() -> Self {
        Self {
            kind: FaultKind::Cancelled,
            message: "The operation was cancelled before it finished".to_owned(),
        }
    }

    fn other(detail: &str) -> Self {
        Self {
            kind: FaultKind::Other,
            message: format!("An unexpected error occurred: {detail}"),
        }
    }
}

/// Error type the wrapped operation may return.
/// Collaborators (like the auth session) map their own errors into this.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("{0}")]
    Other(String),
}

/// Outcome of racing a remote call against the timer.
///
/// Exactly one of these is produced per call; a result that arrives after
/// the timer has already fired is discarded, never surfaced.
#[derive(Debug, Clone)]
pub enum RemoteOutcome {
    /// The server said yes (`success = true`).
    Success(String),
    /// The server said no (`success = false`), message explains why.
    Failure(String),
    /// The timer elapsed first. The call may still be in flight.
    Timeout,
    /// The call itself blew up before the server could answer.
    Errored(RemoteFault),
}

/// Race `op` against a `limit` timer.
///
/// `op` is spawned onto the runtime, so if the timer wins the operation is
/// left running fire-and-forget; only the first resolution is observed.
pub async fn race<F>(op: F, limit: Duration) -> RemoteOutcome
where
    F: Future<Output = Result<(bool, String), RemoteError>> + Send + 'static,
{
    let handle = tokio::spawn(op);

    match tokio::time::timeout(limit, handle).await {
        // Timer won. Dropping the handle detaches the task; its result
        // will be discarded whenever it completes.
        Err(_elapsed) => RemoteOutcome::Timeout,

        Ok(Ok(Ok((true, message)))) => RemoteOutcome::Success(message),
        Ok(Ok(Ok((false, message)))) => RemoteOutcome::Failure(message),

        Ok(Ok(Err(RemoteError::Transport(detail)))) => {
            RemoteOutcome::Errored(RemoteFault::transport(&detail))
        }
        Ok(Ok(Err(RemoteError::Other(detail)))) => {
            RemoteOutcome::Errored(RemoteFault::other(&detail))
        }

        Ok(Err(join_error)) => {
            if join_error.is_cancelled() {
                RemoteOutcome::Errored(RemoteFault::cancelled())
            } else {
                RemoteOutcome::Errored(RemoteFault::other(&join_error.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    #[tokio::test]
    async fn success_comes_through() {
        let outcome = race(async { Ok((true, "ok".to_owned())) }, REMOTE_TIMEOUT).await;
        assert!(matches!(outcome, RemoteOutcome::Success(msg) if msg == "ok"));
    }

    #[tokio::test]
    async fn rejection_is_failure_not_error() {
        let outcome = race(
            async { Ok((false, "user exists".to_owned())) },
            REMOTE_TIMEOUT,
        )
        .await;
        assert!(matches!(outcome, RemoteOutcome::Failure(msg) if msg == "user exists"));
    }

    #[tokio::test]
    async fn transport_and_other_faults_are_distinct() {
        let outcome = race(
            async { Err(RemoteError::Transport("connection refused".to_owned())) },
            REMOTE_TIMEOUT,
        )
        .await;
        let RemoteOutcome::Errored(fault) = outcome else {
            panic!("expected an errored outcome");
        };
        assert_eq!(fault.kind, FaultKind::Transport);

        let outcome = race(
            async { Err(RemoteError::Other("bad payload".to_owned())) },
            REMOTE_TIMEOUT,
        )
        .await;
        let RemoteOutcome::Errored(fault) = outcome else {
            panic!("expected an errored outcome");
        };
        assert_eq!(fault.kind, FaultKind::Other);
    }

    #[tokio::test]
    async fn timer_beats_slow_operation() {
        let outcome = race(
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok((true, "too late".to_owned()))
            },
            Duration::from_millis(20),
        )
        .await;
        assert!(matches!(outcome, RemoteOutcome::Timeout));
    }

    #[tokio::test]
    async fn late_result_does_not_overwrite_timeout() {
        // The operation completes shortly *after* the timer fires. The race
        // must still report Timeout, and the detached task's side effect
        // proves the losing branch was left running rather than cancelled.
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let outcome = race(
            async move {
                tokio::time::sleep(Duration::from_millis(80)).await;
                flag.store(true, Ordering::SeqCst);
                Ok((true, "late".to_owned()))
            },
            Duration::from_millis(20),
        )
        .await;

        assert!(matches!(outcome, RemoteOutcome::Timeout));
        assert!(!finished.load(Ordering::SeqCst));

        // Losing branch keeps running, fire-and-forget.
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn panicking_operation_maps_to_other() {
        let outcome = race(
            async { panic!("boom") },
            REMOTE_TIMEOUT,
        )
        .await;
        let RemoteOutcome::Errored(fault) = outcome else {
            panic!("expected an errored outcome");
        };
        assert_eq!(fault.kind, FaultKind::Other);
    }
}
