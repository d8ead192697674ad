//! Collection, drift check and correction
//!
//! ```text
//! establishments ──► collect (bounded parallel, per-establishment isolation)
//!                        │ EstablishmentProcessor::process per establishment
//!                        ▼
//!                  all records ──► products_data.csv
//!                        │ needs_patch
//!                        ▼
//!                  drifted records ──► products_data_filtered.csv
//!                        │ PatchReconciler (sequential)
//!                        ▼
//!                  passed_items.csv / failed_items.csv
//! ```

mod collector;
mod condition;
mod processor;
mod progress;
mod reconcile;

#[cfg(test)]
pub(crate) mod testing;

pub use collector::{Collection, collect};
pub use condition::{filter_needing_patch, needs_patch};
pub use processor::{CategoryPlan, EstablishmentProcessor};
pub use progress::{Progress, ProgressEvent};
pub use reconcile::{PatchError, PatchReconciler, ReconcileReport, build_payload};

use crate::core::AppResult;
use crate::report::{ArtifactWriter, FAILED_FILE, FILTERED_FILE, PASSED_FILE, PRODUCTS_FILE};
use catalog_client::CatalogApi;
use shared::{EstablishmentId, ItemRecord, PatchOutcome};
use std::path::PathBuf;
use std::sync::Arc;

/// Knobs of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub plan: CategoryPlan,
    pub max_workers: usize,
    pub output_dir: PathBuf,
}

/// Result of a full run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub collected: usize,
    pub needing_patch: usize,
    pub failed_establishments: Vec<EstablishmentId>,
    pub report: ReconcileReport,
}

/// Collection → filtering → reconciliation, with artifacts written between
/// stages
pub struct Pipeline<C: ?Sized> {
    processor: EstablishmentProcessor<C>,
    reconciler: PatchReconciler<C>,
    max_workers: usize,
    artifacts: ArtifactWriter,
    progress: Progress,
}

impl<C: CatalogApi + ?Sized + 'static> Pipeline<C> {
    pub fn new(client: Arc<C>, settings: PipelineSettings) -> Self {
        Self::with_progress(client, settings, Progress::disabled())
    }

    pub fn with_progress(client: Arc<C>, settings: PipelineSettings, progress: Progress) -> Self {
        Self {
            processor: EstablishmentProcessor::new(client.clone(), settings.plan),
            reconciler: PatchReconciler::new(client, progress.clone()),
            max_workers: settings.max_workers,
            artifacts: ArtifactWriter::new(settings.output_dir),
            progress,
        }
    }

    /// Run every stage for `establishments`.
    ///
    /// Per-establishment and per-product failures are absorbed into the
    /// summary; only artifact I/O errors end the run early.
    pub async fn run(&self, establishments: &[EstablishmentId]) -> AppResult<RunSummary> {
        self.artifacts.prepare()?;

        let collection = collect(
            &self.processor,
            establishments,
            self.max_workers,
            &self.progress,
        )
        .await;
        self.write_items(PRODUCTS_FILE, &collection.items)?;

        let needing_patch = filter_needing_patch(&collection.items);
        tracing::info!(
            collected = collection.items.len(),
            needing_patch = needing_patch.len(),
            "Drift check finished"
        );
        self.progress.send(ProgressEvent::Filtered {
            collected: collection.items.len(),
            needs_patch: needing_patch.len(),
        });
        self.write_items(FILTERED_FILE, &needing_patch)?;

        let report = self.reconciler.reconcile(&needing_patch).await;
        self.write_outcomes(FAILED_FILE, &report.failures)?;
        self.write_outcomes(PASSED_FILE, &report.successes)?;

        self.progress.send(ProgressEvent::Summary {
            successes: report.success_count(),
            failures: report.failure_count(),
        });

        Ok(RunSummary {
            collected: collection.items.len(),
            needing_patch: needing_patch.len(),
            failed_establishments: collection.failed.into_iter().map(|(id, _)| id).collect(),
            report,
        })
    }

    fn write_items(&self, file_name: &str, items: &[ItemRecord]) -> AppResult<()> {
        let path = self.artifacts.write_items(file_name, items)?;
        self.progress.send(ProgressEvent::ArtifactWritten {
            path,
            rows: items.len(),
        });
        Ok(())
    }

    fn write_outcomes(&self, file_name: &str, outcomes: &[PatchOutcome]) -> AppResult<()> {
        let path = self.artifacts.write_outcomes(file_name, outcomes)?;
        self.progress.send(ProgressEvent::ArtifactWritten {
            path,
            rows: outcomes.len(),
        });
        Ok(())
    }
}
