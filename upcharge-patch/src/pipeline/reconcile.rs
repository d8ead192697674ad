//! Sequential patch loop and outcome classification

use super::progress::{Progress, ProgressEvent};
use catalog_client::CatalogApi;
use rust_decimal::prelude::*;
use shared::{FieldValue, ItemRecord, ItemUpdatePayload, PatchOutcome};
use std::sync::Arc;

/// Payload construction failure for one item
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    #[error("field `{field}` is not a valid {expected}: {value:?}")]
    FieldCoercion {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

fn coercion(field: &'static str, expected: &'static str, value: &FieldValue) -> PatchError {
    PatchError::FieldCoercion {
        field,
        expected,
        value: value.to_string(),
    }
}

fn integer(field: &'static str, value: &FieldValue) -> Result<i64, PatchError> {
    value.as_integer().ok_or_else(|| coercion(field, "integer", value))
}

/// Product id and corrective update for `item`.
///
/// Reference fields are copied verbatim, numeric fields coerced, and
/// `combo_upcharge` set to the textual form of `price`.
pub fn build_payload(item: &ItemRecord) -> Result<(i64, ItemUpdatePayload), PatchError> {
    let product_id = integer("id", &item.id)?;
    let price = item
        .price
        .as_decimal()
        .ok_or_else(|| coercion("price", "decimal", &item.price))?;
    let price_float = price
        .to_f64()
        .ok_or_else(|| coercion("price", "float", &item.price))?;

    let payload = ItemUpdatePayload {
        name: item.name.clone(),
        price: price_float,
        establishment: item.establishment.clone(),
        updated_by: item.updated_by.clone(),
        created_by: item.created_by.clone(),
        category: item.category.clone(),
        attribute_type: integer("attribute_type", &item.attribute_type)?,
        tax_class: integer("tax_class", &item.tax_class)?,
        variable_pricing_by: integer("variable_pricing_by", &item.variable_pricing_by)?,
        sorting: integer("sorting", &item.sorting)?,
        combo_upcharge: price.normalize().to_string(),
    };
    Ok((product_id, payload))
}

/// Outcomes of one reconciliation pass, partitioned by result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub successes: Vec<PatchOutcome>,
    pub failures: Vec<PatchOutcome>,
}

impl ReconcileReport {
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }
}

/// Patches items one at a time, in order
pub struct PatchReconciler<C: ?Sized> {
    client: Arc<C>,
    progress: Progress,
}

impl<C: CatalogApi + ?Sized> PatchReconciler<C> {
    pub fn new(client: Arc<C>, progress: Progress) -> Self {
        Self { client, progress }
    }

    pub async fn reconcile(&self, items: &[ItemRecord]) -> ReconcileReport {
        self.progress
            .send(ProgressEvent::PatchingStarted { items: items.len() });

        let mut report = ReconcileReport::default();
        for item in items {
            let outcome = self.patch_one(item).await;
            self.progress.send(ProgressEvent::Patched(outcome.clone()));
            if outcome.is_success() {
                report.successes.push(outcome);
            } else {
                report.failures.push(outcome);
            }
        }

        tracing::info!(
            successes = report.success_count(),
            failures = report.failure_count(),
            "Reconciliation finished"
        );
        report
    }

    async fn patch_one(&self, item: &ItemRecord) -> PatchOutcome {
        let mut outcome = PatchOutcome {
            product_id: item.id.to_string(),
            name: item.name.to_string(),
            establishment: item.establishment.to_string(),
            category: item.category.to_string(),
            status_code: None,
            response_text: String::new(),
        };

        let (product_id, payload) = match build_payload(item) {
            Ok(built) => built,
            Err(e) => {
                tracing::warn!(
                    product_id = %outcome.product_id,
                    name = %outcome.name,
                    error = %e,
                    "Product skipped: payload could not be built"
                );
                outcome.response_text = e.to_string();
                return outcome;
            }
        };

        match self.client.patch_item(product_id, &payload).await {
            Ok(response) => {
                if !response.is_accepted() {
                    tracing::warn!(
                        product_id,
                        name = %outcome.name,
                        status = response.status_code,
                        "Product update refused"
                    );
                }
                outcome.status_code = Some(response.status_code);
                outcome.response_text = response.body;
            }
            Err(e) => {
                tracing::error!(
                    product_id,
                    name = %outcome.name,
                    error = %e,
                    "Product update not delivered"
                );
                outcome.response_text = e.to_string();
            }
        }
        outcome
    }
}
