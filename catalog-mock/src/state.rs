//! Fixture state of the mock catalog

use serde_json::Value;
use shared::{CategoryListing, Establishment, EstablishmentId};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Product update received by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPatch {
    pub product_id: i64,
    pub body: Value,
}

/// Category lookup received by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRequest {
    pub establishment: i64,
    pub name: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Default)]
pub(crate) struct CatalogState {
    pub api_key: Option<String>,
    pub establishments: Vec<Establishment>,
    pub categories: HashMap<(i64, String), Vec<CategoryListing>>,
    pub products: HashMap<(i64, i64), Vec<Value>>,
    pub patch_status: HashMap<i64, u16>,
    pub broken: HashSet<i64>,
    pub stalled: HashSet<i64>,
    pub failing: HashMap<i64, u16>,
    pub latency: Option<Duration>,
    pub patches: Vec<RecordedPatch>,
    pub category_requests: Vec<CategoryRequest>,
    pub rejected_requests: usize,
}

/// In-memory catalog served by [`crate::api::router`]
#[derive(Debug, Default)]
pub struct MockCatalog {
    state: Mutex<CatalogState>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn state_mut(&mut self) -> &mut CatalogState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Require this credential in the `API-AUTHENTICATION` header
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.state_mut().api_key = Some(key.into());
        self
    }

    pub fn with_establishment(mut self, id: i64, name: impl Into<String>) -> Self {
        self.state_mut().establishments.push(Establishment {
            name: name.into(),
            id: EstablishmentId(id),
        });
        self
    }

    /// Subcategories returned when `establishment` asks for `category_name`
    pub fn with_category(
        mut self,
        establishment: i64,
        category_name: impl Into<String>,
        listings: &[(&str, i64)],
    ) -> Self {
        let listings = listings
            .iter()
            .map(|(name, id)| CategoryListing {
                name: (*name).to_string(),
                id: *id,
            })
            .collect();
        self.state_mut()
            .categories
            .insert((establishment, category_name.into()), listings);
        self
    }

    /// Raw product rows filed under `category_id` in `establishment`
    pub fn with_products(mut self, establishment: i64, category_id: i64, rows: Vec<Value>) -> Self {
        self.state_mut()
            .products
            .insert((establishment, category_id), rows);
        self
    }

    /// Answer updates of `product_id` with `status` instead of 202
    pub fn with_patch_status(mut self, product_id: i64, status: u16) -> Self {
        self.state_mut().patch_status.insert(product_id, status);
        self
    }

    /// Serve a non-JSON body for every lookup of `establishment`
    pub fn with_broken_establishment(mut self, establishment: i64) -> Self {
        self.state_mut().broken.insert(establishment);
        self
    }

    /// Never answer lookups of `establishment` in a useful time
    pub fn with_stalled_establishment(mut self, establishment: i64) -> Self {
        self.state_mut().stalled.insert(establishment);
        self
    }

    /// Answer lookups of `establishment` with `status`
    pub fn with_failing_establishment(mut self, establishment: i64, status: u16) -> Self {
        self.state_mut().failing.insert(establishment, status);
        self
    }

    /// Delay every lookup response
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.state_mut().latency = Some(latency);
        self
    }

    /// Updates received so far, in arrival order
    pub fn patches(&self) -> Vec<RecordedPatch> {
        self.lock().patches.clone()
    }

    /// Category lookups received so far, in arrival order
    pub fn category_requests(&self) -> Vec<CategoryRequest> {
        self.lock().category_requests.clone()
    }

    /// Requests refused for a missing or wrong credential
    pub fn rejected_requests(&self) -> usize {
        self.lock().rejected_requests
    }

    /// Highest number of lookups that were being served at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn enter(&self) -> InFlight<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlight { catalog: self }
    }

    /// Two establishments with both catering variants, umbrella entries and
    /// a mix of drifted and correct upcharges
    pub fn demo() -> Self {
        use serde_json::json;

        Self::new()
            .with_establishment(1, "Main Street")
            .with_establishment(2, "Harbor View")
            .with_category(1, "Catering", &[("Catering", 100), ("Hoagie Trays", 101)])
            .with_category(1, "• Catering", &[("Tray Sides", 102), ("Online Trays", 103)])
            .with_category(2, "Catering", &[("Hoagie Trays", 201)])
            .with_products(
                1,
                101,
                vec![
                    demo_product(5001, 1, "Italian Tray", json!("64.99"), json!("59.99")),
                    demo_product(5002, 1, "Turkey Tray", json!("54.99"), json!("54.99")),
                ],
            )
            .with_products(
                1,
                103,
                vec![demo_product(5003, 1, "Online Italian Tray", json!(64.99), json!("0.00"))],
            )
            .with_products(
                2,
                201,
                vec![demo_product(6001, 2, "Italian Tray", json!("64.99"), json!("64.99"))],
            )
    }
}

fn demo_product(id: i64, establishment: i64, name: &str, price: Value, upcharge: Value) -> Value {
    serde_json::json!({
        "id": id,
        "establishment": format!("/enterprise/Establishment/{establishment}/"),
        "name": name,
        "price": price,
        "combo_upcharge": upcharge,
        "attribute_type": 0,
        "sorting": 1,
        "tax_class": 1,
        "variable_pricing_by": 0,
        "updated_by": "/enterprise/User/1/",
        "created_by": "/enterprise/User/1/",
        "category": "/products/ProductCategory/101/",
        "barcode": null,
        "active": true
    })
}

/// Guard counting one lookup being served
pub(crate) struct InFlight<'a> {
    catalog: &'a MockCatalog,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.catalog.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
