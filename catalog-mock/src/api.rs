use crate::state::{CategoryRequest, MockCatalog, RecordedPatch};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

/// How long a stalled establishment keeps the caller waiting
const STALL: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
pub struct CategoryQuery {
    establishment: i64,
    name: String,
    limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct ProductQuery {
    establishment: i64,
    category: i64,
    limit: Option<usize>,
}

fn rejection(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Credential check shared by every route
fn authorize(catalog: &MockCatalog, headers: &HeaderMap) -> Result<(), Response> {
    let mut state = catalog.lock();
    let Some(expected) = state.api_key.clone() else {
        return Ok(());
    };
    let presented = headers
        .get("api-authentication")
        .and_then(|v| v.to_str().ok());
    if presented == Some(expected.as_str()) {
        Ok(())
    } else {
        state.rejected_requests += 1;
        Err(rejection(StatusCode::UNAUTHORIZED, "invalid API key"))
    }
}

/// Fault injection and latency for lookups of one establishment
async fn lookup_faults(catalog: &MockCatalog, establishment: i64) -> Option<Response> {
    let (latency, stalled, broken, failing) = {
        let state = catalog.lock();
        (
            state.latency,
            state.stalled.contains(&establishment),
            state.broken.contains(&establishment),
            state.failing.get(&establishment).copied(),
        )
    };

    if let Some(latency) = latency {
        tokio::time::sleep(latency).await;
    }
    if stalled {
        tokio::time::sleep(STALL).await;
    }
    if broken {
        return Some((StatusCode::OK, "<html>maintenance</html>").into_response());
    }
    if let Some(status) = failing {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return Some(rejection(status, "establishment unavailable"));
    }
    None
}

fn truncate<T>(mut rows: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

async fn list_establishments(
    State(catalog): State<Arc<MockCatalog>>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = authorize(&catalog, &headers) {
        return rejected;
    }
    let objects = catalog.lock().establishments.clone();
    Json(json!({ "objects": objects })).into_response()
}

async fn list_categories(
    State(catalog): State<Arc<MockCatalog>>,
    headers: HeaderMap,
    Query(query): Query<CategoryQuery>,
) -> Response {
    if let Err(rejected) = authorize(&catalog, &headers) {
        return rejected;
    }
    let _in_flight = catalog.enter();

    catalog.lock().category_requests.push(CategoryRequest {
        establishment: query.establishment,
        name: query.name.clone(),
        limit: query.limit,
    });

    if let Some(fault) = lookup_faults(&catalog, query.establishment).await {
        return fault;
    }

    let listings = catalog
        .lock()
        .categories
        .get(&(query.establishment, query.name.clone()))
        .cloned();

    let objects = match listings {
        Some(listings) => vec![json!({
            "name": query.name,
            "subcategories": truncate(listings, query.limit),
        })],
        None => Vec::new(),
    };
    Json(json!({ "objects": objects })).into_response()
}

async fn list_products(
    State(catalog): State<Arc<MockCatalog>>,
    headers: HeaderMap,
    Query(query): Query<ProductQuery>,
) -> Response {
    if let Err(rejected) = authorize(&catalog, &headers) {
        return rejected;
    }
    let _in_flight = catalog.enter();

    if let Some(fault) = lookup_faults(&catalog, query.establishment).await {
        return fault;
    }

    let rows = catalog
        .lock()
        .products
        .get(&(query.establishment, query.category))
        .cloned()
        .unwrap_or_default();
    Json(json!({ "objects": truncate(rows, query.limit) })).into_response()
}

async fn patch_product(
    State(catalog): State<Arc<MockCatalog>>,
    headers: HeaderMap,
    Path(product_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejected) = authorize(&catalog, &headers) {
        return rejected;
    }

    let status = {
        let mut state = catalog.lock();
        state.patches.push(RecordedPatch {
            product_id,
            body: body.clone(),
        });
        state.patch_status.get(&product_id).copied().unwrap_or(202)
    };

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status == StatusCode::ACCEPTED {
        (status, Json(json!({ "id": product_id, "updated": body }))).into_response()
    } else {
        rejection(status, "product update refused")
    }
}

pub fn router(catalog: Arc<MockCatalog>) -> Router {
    Router::new()
        .route("/enterprise/Establishment/", get(list_establishments))
        .route("/products/ProductCategory/", get(list_categories))
        .route("/resources/Product/", get(list_products))
        .route("/resources/Product/{product_id}/", patch(patch_product))
        .with_state(catalog)
}
