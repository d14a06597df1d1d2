//! Observability hooks around each call.
//!
//! The client wraps every request lifecycle in a named step and attaches the
//! outgoing headers/body before execution and the response artifacts after.
//! Recording is strictly side-channel: an observer failure is demoted to a
//! diagnostic and never alters the call's own outcome.

use std::sync::Mutex;
use thiserror::Error;

/// Failure inside an observer implementation. Stays cosmetic.
#[derive(Debug, Clone, Error)]
#[error("observer error: {0}")]
pub struct ObserveError(pub String);

/// Terminal state of one observed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The exchange completed, whatever the HTTP status.
    Succeeded { status: u16 },
    /// All attempts failed at the transport level.
    Failed { error: String },
}

/// One named artifact recorded inside a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub mime: String,
    pub content: String,
}

/// Receives the structured narrative of each call.
pub trait CallObserver: Send + Sync {
    fn begin_step(&self, name: &str);
    fn attach(&self, name: &str, mime: &str, content: &str) -> Result<(), ObserveError>;
    fn end_step(&self, name: &str, outcome: &StepOutcome);
}

/// Discards everything; lets the core logic be tested without a sink.
pub struct NoopObserver;

impl CallObserver for NoopObserver {
    fn begin_step(&self, _name: &str) {}

    fn attach(&self, _name: &str, _mime: &str, _content: &str) -> Result<(), ObserveError> {
        Ok(())
    }

    fn end_step(&self, _name: &str, _outcome: &StepOutcome) {}
}

/// Emits the narrative as structured tracing events.
pub struct TracingObserver;

impl CallObserver for TracingObserver {
    fn begin_step(&self, name: &str) {
        tracing::info!(step = name, "begin");
    }

    fn attach(&self, name: &str, mime: &str, content: &str) -> Result<(), ObserveError> {
        tracing::debug!(attachment = name, mime, content, "attach");
        Ok(())
    }

    fn end_step(&self, name: &str, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Succeeded { status } => {
                tracing::info!(step = name, status, "end");
            }
            StepOutcome::Failed { error } => {
                tracing::warn!(step = name, error, "end");
            }
        }
    }
}

/// A completed (or open) step with its attachments.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub name: String,
    pub attachments: Vec<Attachment>,
    pub outcome: Option<StepOutcome>,
}

/// In-memory report sink: collects the full narrative for later inspection
/// (CI artifact dumps, test assertions).
#[derive(Default)]
pub struct MemoryObserver {
    steps: Mutex<Vec<StepRecord>>,
}

impl MemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded step.
    pub fn records(&self) -> Vec<StepRecord> {
        self.steps.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl CallObserver for MemoryObserver {
    fn begin_step(&self, name: &str) {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push(StepRecord {
                name: name.to_string(),
                attachments: Vec::new(),
                outcome: None,
            });
        }
    }

    fn attach(&self, name: &str, mime: &str, content: &str) -> Result<(), ObserveError> {
        let mut steps = self
            .steps
            .lock()
            .map_err(|_| ObserveError("report sink poisoned".into()))?;
        let step = steps
            .last_mut()
            .ok_or_else(|| ObserveError("attachment outside of a step".into()))?;
        step.attachments.push(Attachment {
            name: name.to_string(),
            mime: mime.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }

    fn end_step(&self, name: &str, outcome: &StepOutcome) {
        if let Ok(mut steps) = self.steps.lock()
            && let Some(step) = steps.iter_mut().rev().find(|s| s.name == name)
        {
            step.outcome = Some(outcome.clone());
        }
    }
}
