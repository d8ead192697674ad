//! Parallel collection across establishments
//!
//! One task per establishment, at most `max_workers` of them talking to the
//! catalog at once. Results are folded in completion order by this function
//! alone; tasks never touch the shared result list. A failing establishment
//! is logged and contributes nothing, its siblings carry on. A task that
//! panics counts as a failure of the establishment it was collecting.

use super::processor::EstablishmentProcessor;
use super::progress::{Progress, ProgressEvent};
use catalog_client::CatalogApi;
use shared::{EstablishmentId, ItemRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Everything gathered by one collection pass
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Records of every establishment that completed, in completion order
    pub items: Vec<ItemRecord>,
    /// Establishments that completed, in completion order
    pub completed: Vec<EstablishmentId>,
    /// Establishments that failed, with the error that stopped them
    pub failed: Vec<(EstablishmentId, String)>,
}

pub async fn collect<C>(
    processor: &EstablishmentProcessor<C>,
    establishments: &[EstablishmentId],
    max_workers: usize,
    progress: &Progress,
) -> Collection
where
    C: CatalogApi + ?Sized + 'static,
{
    let max_workers = max_workers.max(1);
    tracing::info!(
        establishments = establishments.len(),
        max_workers,
        "Collecting catering products"
    );

    let semaphore = Arc::new(Semaphore::new(max_workers));
    let mut tasks = JoinSet::new();
    let mut owners = HashMap::with_capacity(establishments.len());

    for &establishment in establishments {
        let processor = processor.clone();
        let semaphore = semaphore.clone();
        let progress = progress.clone();

        let handle = tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("semaphore is never closed");
            progress.send(ProgressEvent::CollectionStarted { establishment });
            processor.process(establishment).await
        });
        owners.insert(handle.id(), establishment);
    }

    let mut collection = Collection::default();
    while let Some(joined) = tasks.join_next_with_id().await {
        let (task_id, result) = match joined {
            Ok((task_id, result)) => (task_id, result.map_err(|e| e.to_string())),
            Err(e) => (e.id(), Err(format!("collection task failed: {e}"))),
        };
        let Some(establishment) = owners.remove(&task_id) else {
            tracing::error!(task = %task_id, "Collection task without establishment");
            continue;
        };

        match result {
            Ok(items) => {
                tracing::info!(
                    establishment = %establishment,
                    items = items.len(),
                    "Establishment collected"
                );
                progress.send(ProgressEvent::CollectionCompleted {
                    establishment,
                    items: items.len(),
                });
                collection.items.extend(items);
                collection.completed.push(establishment);
            }
            Err(error) => {
                tracing::error!(
                    establishment = %establishment,
                    error = %error,
                    "Establishment collection failed"
                );
                progress.send(ProgressEvent::CollectionFailed {
                    establishment,
                    error: error.clone(),
                });
                collection.failed.push((establishment, error));
            }
        }
    }

    tracing::info!(
        items = collection.items.len(),
        completed = collection.completed.len(),
        failed = collection.failed.len(),
        "Collection finished"
    );
    collection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processor::CategoryPlan;
    use crate::pipeline::testing::FakeCatalog;
    use std::time::Duration;

    fn plan() -> CategoryPlan {
        CategoryPlan::new(vec!["Catering".into()], vec!["Catering".into()])
    }

    fn catalog_with(establishments: &[i64]) -> FakeCatalog {
        establishments.iter().fold(FakeCatalog::new(), |catalog, &est| {
            catalog
                .category(est, "Catering", &[("Trays", est * 10)])
                .products(est, est * 10, &[est * 100, est * 100 + 1])
        })
    }

    fn ids(values: &[i64]) -> Vec<EstablishmentId> {
        values.iter().copied().map(EstablishmentId).collect()
    }

    #[tokio::test]
    async fn failing_establishment_is_isolated() {
        let catalog = catalog_with(&[1, 2, 3]).failing(2);
        let processor = EstablishmentProcessor::new(Arc::new(catalog), plan());
        let (progress, mut rx) = Progress::channel();

        let collection = collect(&processor, &ids(&[1, 2, 3]), 8, &progress).await;

        assert_eq!(collection.items.len(), 4);
        assert_eq!(collection.failed.len(), 1);
        assert_eq!(collection.failed[0].0, EstablishmentId(2));
        let mut completed = collection.completed.clone();
        completed.sort();
        assert_eq!(completed, ids(&[1, 3]));

        drop(progress);
        let mut failures = 0;
        while let Some(event) = rx.recv().await {
            if let ProgressEvent::CollectionFailed { establishment, .. } = event {
                assert_eq!(establishment, EstablishmentId(2));
                failures += 1;
            }
        }
        assert_eq!(failures, 1);
    }

    #[tokio::test]
    async fn panicking_establishment_is_reported_as_failed() {
        let catalog = catalog_with(&[1, 2]).panicking(2);
        let processor = EstablishmentProcessor::new(Arc::new(catalog), plan());
        let (progress, mut rx) = Progress::channel();

        let collection = collect(&processor, &ids(&[1, 2]), 2, &progress).await;

        assert_eq!(collection.completed, ids(&[1]));
        assert_eq!(collection.items.len(), 2);
        assert_eq!(collection.failed.len(), 1);
        assert_eq!(collection.failed[0].0, EstablishmentId(2));
        assert!(collection.failed[0].1.contains("panic"));

        drop(progress);
        let mut failed = Vec::new();
        while let Some(event) = rx.recv().await {
            if let ProgressEvent::CollectionFailed { establishment, .. } = event {
                failed.push(establishment);
            }
        }
        assert_eq!(failed, ids(&[2]));
    }

    #[tokio::test]
    async fn every_establishment_failing_yields_nothing() {
        let catalog = FakeCatalog::new().failing(1).failing(2);
        let processor = EstablishmentProcessor::new(Arc::new(catalog), plan());

        let collection = collect(&processor, &ids(&[1, 2]), 2, &Progress::disabled()).await;

        assert!(collection.items.is_empty());
        assert!(collection.completed.is_empty());
        assert_eq!(collection.failed.len(), 2);
    }

    #[tokio::test]
    async fn concurrency_stays_within_worker_bound() {
        let establishments: Vec<i64> = (1..=12).collect();
        let catalog = Arc::new(catalog_with(&establishments).latency(Duration::from_millis(20)));
        let processor = EstablishmentProcessor::new(catalog.clone(), plan());

        let collection = collect(&processor, &ids(&establishments), 3, &Progress::disabled()).await;

        assert_eq!(collection.completed.len(), 12);
        assert_eq!(collection.items.len(), 24);
        assert!(catalog.peak_in_flight() <= 3);
        assert!(catalog.peak_in_flight() >= 1);
    }

    #[tokio::test]
    async fn zero_workers_still_makes_progress() {
        let processor = EstablishmentProcessor::new(Arc::new(catalog_with(&[1])), plan());
        let collection = collect(&processor, &ids(&[1]), 0, &Progress::disabled()).await;
        assert_eq!(collection.completed, ids(&[1]));
    }

    #[tokio::test]
    async fn records_of_one_establishment_stay_contiguous() {
        let catalog = catalog_with(&[1, 2]);
        let processor = EstablishmentProcessor::new(Arc::new(catalog), plan());

        let collection = collect(&processor, &ids(&[1, 2]), 2, &Progress::disabled()).await;

        let ids: Vec<String> = collection.items.iter().map(|i| i.id.to_string()).collect();
        let first = &ids[..2];
        assert!(first == ["100", "101"] || first == ["200", "201"]);
    }
}
