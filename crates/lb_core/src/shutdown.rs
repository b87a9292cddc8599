//! Ordered, best-effort shutdown.
//!
//! At window close a fixed list of cleanup steps runs exactly once, in
//! registration order. A failing step is recorded and the next step still
//! runs; the report of what happened is logged, never propagated, so the
//! window always gets to close.

use futures::future::BoxFuture;
use std::future::Future;

use crate::err;

/// Why a cleanup step failed. Free-form, only ever shown in logs.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StepError(pub String);

impl StepError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type StepResult = Result<(), StepError>;

struct ShutdownStep {
    name: &'static str,
    work: BoxFuture<'static, StepResult>,
}

/// A fixed sequence of named cleanup steps.
///
/// Steps own whatever they need to clean up (moved into the closure), which
/// also guarantees each one can only run once.
#[derive(Default)]
pub struct ShutdownSequence {
    steps: Vec<ShutdownStep>,
}

impl ShutdownSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cleanup step. Steps run in registration order.
    pub fn push<F>(&mut self, name: &'static str, work: F)
    where
        F: Future<Output = StepResult> + Send + 'static,
    {
        self.steps.push(ShutdownStep {
            name,
            work: Box::pin(work),
        });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step, in order, each one guarded. Consumes the sequence so
    /// it cannot run twice.
    pub async fn run(self) -> ShutdownReport {
        let mut outcomes = Vec::with_capacity(self.steps.len());
        for step in self.steps {
            let result = step.work.await;
            if let Err(error) = &result {
                err!("Shutdown step \"{}\" failed: {error}", step.name);
            }
            outcomes.push(StepOutcome {
                name: step.name,
                result,
            });
        }
        ShutdownReport { outcomes }
    }
}

#[derive(Debug)]
pub struct StepOutcome {
    pub name: &'static str,
    pub result: StepResult,
}

/// What happened during shutdown, step by step. Logged, not propagated.
#[derive(Debug)]
pub struct ShutdownReport {
    pub outcomes: Vec<StepOutcome>,
}

impl ShutdownReport {
    pub fn all_ok(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    /// One-line summary for the final log message.
    pub fn summary(&self) -> String {
        let failed = self.failures().count();
        if failed == 0 {
            format!("all {} shutdown steps completed", self.outcomes.len())
        } else {
            format!(
                "{failed} of {} shutdown steps failed: {}",
                self.outcomes.len(),
                self.failures()
                    .map(|o| o.name)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        }
    }
}
