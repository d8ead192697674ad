//! Operator-facing progress stream
//!
//! Separate from tracing logs: each event renders as the text an operator
//! watches while a run is in flight. The receiving side (CLI, a GUI shell)
//! decides where it goes. A dropped receiver never affects the run.

use shared::{EstablishmentId, PatchOutcome};
use std::fmt;
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    CollectionStarted {
        establishment: EstablishmentId,
    },
    CollectionCompleted {
        establishment: EstablishmentId,
        items: usize,
    },
    CollectionFailed {
        establishment: EstablishmentId,
        error: String,
    },
    Filtered {
        collected: usize,
        needs_patch: usize,
    },
    PatchingStarted {
        items: usize,
    },
    Patched(PatchOutcome),
    ArtifactWritten {
        path: PathBuf,
        rows: usize,
    },
    Summary {
        successes: usize,
        failures: usize,
    },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::CollectionStarted { establishment } => {
                write!(f, "Starting data processing for establishment: {establishment}")
            }
            ProgressEvent::CollectionCompleted {
                establishment,
                items,
            } => write!(
                f,
                "Data collection completed for establishment: {establishment} ({items} items)"
            ),
            ProgressEvent::CollectionFailed {
                establishment,
                error,
            } => write!(f, "Establishment {establishment} generated an exception: {error}"),
            ProgressEvent::Filtered {
                collected,
                needs_patch,
            } => write!(
                f,
                "{needs_patch} of {collected} items have a combo upcharge that differs from price"
            ),
            ProgressEvent::PatchingStarted { items } => write!(f, "Patching {items} items:"),
            ProgressEvent::Patched(outcome) => match outcome.status_code {
                Some(code) => write!(
                    f,
                    "Updated product {} with ID {}, Status Code: {code}",
                    outcome.name, outcome.product_id
                ),
                None => write!(
                    f,
                    "Could not update product {} with ID {}: {}",
                    outcome.name, outcome.product_id, outcome.response_text
                ),
            },
            ProgressEvent::ArtifactWritten { path, rows } => {
                write!(f, "Wrote {rows} rows to {}", path.display())
            }
            ProgressEvent::Summary {
                successes,
                failures,
            } => {
                writeln!(
                    f,
                    "{failures} items failed to update. See the failed_items.csv for more information."
                )?;
                write!(
                    f,
                    "{successes} items were patched successfully. See the passed_items.csv file for more information"
                )
            }
        }
    }
}

/// Sending half of the progress stream; cheap to clone into tasks
#[derive(Debug, Clone, Default)]
pub struct Progress {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl Progress {
    /// Connected progress stream and its receiver
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Progress sink that discards every event
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
