//! In-memory `CatalogApi` for unit tests

use async_trait::async_trait;
use catalog_client::{CatalogApi, ClientError, ClientResult};
use shared::{
    CategoryListing, EstablishmentId, FieldValue, ItemRecord, ItemUpdatePayload, PatchResponse,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn decode_error() -> ClientError {
    ClientError::Decode(serde_json::from_str::<serde_json::Value>("<html>").unwrap_err())
}

/// Catering item with the given id, price and upcharge
pub fn catering_item(id: i64, price: &str, combo_upcharge: &str) -> ItemRecord {
    ItemRecord {
        combo_upcharge: combo_upcharge.into(),
        id: id.into(),
        establishment: "/enterprise/Establishment/1/".into(),
        name: FieldValue::Text(format!("Tray {id}")),
        attribute_type: 0_i64.into(),
        price: price.into(),
        sorting: 1_i64.into(),
        updated_by: "/enterprise/User/1/".into(),
        variable_pricing_by: 0_i64.into(),
        tax_class: 1_i64.into(),
        created_by: "/enterprise/User/1/".into(),
        category: "/products/ProductCategory/11/".into(),
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    establishments: BTreeMap<String, EstablishmentId>,
    categories: HashMap<(i64, String), Vec<CategoryListing>>,
    products: HashMap<(i64, i64), Vec<ItemRecord>>,
    failing: HashSet<i64>,
    failing_products: HashSet<i64>,
    panicking: HashSet<i64>,
    patch_status: HashMap<i64, u16>,
    unreachable_patches: HashSet<i64>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    pub patches: Mutex<Vec<(i64, ItemUpdatePayload)>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn establishment(mut self, id: i64, name: &str) -> Self {
        self.establishments.insert(name.to_string(), EstablishmentId(id));
        self
    }

    pub fn category(mut self, establishment: i64, name: &str, listings: &[(&str, i64)]) -> Self {
        let listings = listings
            .iter()
            .map(|(name, id)| CategoryListing {
                name: (*name).to_string(),
                id: *id,
            })
            .collect();
        self.categories
            .insert((establishment, name.to_string()), listings);
        self
    }

    pub fn products(mut self, establishment: i64, category_id: i64, ids: &[i64]) -> Self {
        let items = ids
            .iter()
            .map(|id| catering_item(*id, "10.00", "8.00"))
            .collect();
        self.products.insert((establishment, category_id), items);
        self
    }

    pub fn records(mut self, establishment: i64, category_id: i64, items: Vec<ItemRecord>) -> Self {
        self.products.insert((establishment, category_id), items);
        self
    }

    /// Every lookup of `establishment` fails
    pub fn failing(mut self, establishment: i64) -> Self {
        self.failing.insert(establishment);
        self
    }

    /// Product fetches of `establishment` fail, category lookups succeed
    pub fn failing_products(mut self, establishment: i64) -> Self {
        self.failing_products.insert(establishment);
        self
    }

    /// Lookups of `establishment` panic instead of returning
    pub fn panicking(mut self, establishment: i64) -> Self {
        self.panicking.insert(establishment);
        self
    }

    pub fn patch_status(mut self, product_id: i64, status: u16) -> Self {
        self.patch_status.insert(product_id, status);
        self
    }

    /// Updates of `product_id` fail before any answer arrives
    pub fn unreachable_patch(mut self, product_id: i64) -> Self {
        self.unreachable_patches.insert(product_id);
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn patched_ids(&self) -> Vec<i64> {
        self.patches
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| *id)
            .collect()
    }

    async fn lookup(&self, establishment: EstablishmentId) -> ClientResult<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panicking.contains(&establishment.get()) {
            panic!("catalog lookup for establishment {establishment} panicked");
        }
        if self.failing.contains(&establishment.get()) {
            return Err(decode_error());
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn list_establishments(&self) -> ClientResult<BTreeMap<String, EstablishmentId>> {
        Ok(self.establishments.clone())
    }

    async fn list_category_items(
        &self,
        establishment: EstablishmentId,
        category_name: &str,
    ) -> ClientResult<Vec<CategoryListing>> {
        self.lookup(establishment).await?;
        Ok(self
            .categories
            .get(&(establishment.get(), category_name.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_item_records(
        &self,
        establishment: EstablishmentId,
        category_id: i64,
    ) -> ClientResult<Vec<ItemRecord>> {
        self.lookup(establishment).await?;
        if self.failing_products.contains(&establishment.get()) {
            return Err(decode_error());
        }
        Ok(self
            .products
            .get(&(establishment.get(), category_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn patch_item(
        &self,
        item_id: i64,
        payload: &ItemUpdatePayload,
    ) -> ClientResult<PatchResponse> {
        self.patches.lock().unwrap().push((item_id, payload.clone()));
        if self.unreachable_patches.contains(&item_id) {
            // reqwest::Error has no public constructor; the real transport
            // path is covered by the client's integration tests
            return Err(ClientError::Config("patch request was never sent".into()));
        }
        let status_code = self.patch_status.get(&item_id).copied().unwrap_or(202);
        Ok(PatchResponse {
            status_code,
            body: format!("{{\"id\": {item_id}}}"),
        })
    }
}
