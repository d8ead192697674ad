//! Per-establishment collection: category lookup, exclusion, expansion

use catalog_client::{CatalogApi, ClientResult};
use shared::{CategoryListing, EstablishmentId, ItemRecord};
use std::sync::Arc;

/// Which categories to query and which listing names to skip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPlan {
    pub category_names: Vec<String>,
    pub excluded_listings: Vec<String>,
}

impl CategoryPlan {
    pub fn new(category_names: Vec<String>, excluded_listings: Vec<String>) -> Self {
        Self {
            category_names,
            excluded_listings,
        }
    }

    /// Exact name match only: "Tray Sides Deluxe" is not "Tray Sides"
    pub fn is_excluded(&self, listing_name: &str) -> bool {
        self.excluded_listings.iter().any(|n| n == listing_name)
    }
}

/// Collects the patchable records of one establishment
pub struct EstablishmentProcessor<C: ?Sized> {
    client: Arc<C>,
    plan: Arc<CategoryPlan>,
}

impl<C: ?Sized> Clone for EstablishmentProcessor<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            plan: self.plan.clone(),
        }
    }
}

impl<C: CatalogApi + ?Sized> EstablishmentProcessor<C> {
    pub fn new(client: Arc<C>, plan: CategoryPlan) -> Self {
        Self {
            client,
            plan: Arc::new(plan),
        }
    }

    /// Listings of every planned category, excluded names removed.
    ///
    /// Categories keep their planned order and each keeps the order the
    /// catalog returned.
    pub async fn listings(&self, establishment: EstablishmentId) -> ClientResult<Vec<CategoryListing>> {
        let mut listings = Vec::new();
        for category_name in &self.plan.category_names {
            let found = self
                .client
                .list_category_items(establishment, category_name)
                .await?;
            tracing::debug!(
                establishment = %establishment,
                category = %category_name,
                listings = found.len(),
                "Category lookup"
            );
            listings.extend(
                found
                    .into_iter()
                    .filter(|listing| !self.plan.is_excluded(&listing.name)),
            );
        }
        Ok(listings)
    }

    /// All product records of the establishment's planned categories.
    ///
    /// The first failing call fails the whole establishment.
    pub async fn process(&self, establishment: EstablishmentId) -> ClientResult<Vec<ItemRecord>> {
        let listings = self.listings(establishment).await?;

        let mut records = Vec::new();
        for listing in &listings {
            let items = self
                .client
                .fetch_item_records(establishment, listing.id)
                .await?;
            tracing::debug!(
                establishment = %establishment,
                listing = %listing.name,
                items = items.len(),
                "Fetched products"
            );
            records.extend(items);
        }
        Ok(records)
    }
}
