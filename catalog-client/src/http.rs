//! HTTP client for network-based catalog calls

use crate::types::{CategoryObject, ObjectList};
use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use shared::{
    CategoryListing, Establishment, EstablishmentId, ItemRecord, ItemUpdatePayload, PatchResponse,
};
use std::collections::BTreeMap;

/// Header carrying the static API credential (`API-AUTHENTICATION`)
pub const AUTH_HEADER: &str = "api-authentication";

const ESTABLISHMENT_PATH: &str = "enterprise/Establishment/";
const CATEGORY_PATH: &str = "products/ProductCategory/";
const PRODUCT_PATH: &str = "resources/Product/";

/// Catalog API operations
///
/// Listing calls fail on transport, status or decode errors. `patch_item`
/// only fails on transport errors: the HTTP status is part of the answer.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Establishment name to id, ordered by name
    async fn list_establishments(&self) -> ClientResult<BTreeMap<String, EstablishmentId>>;

    /// Subcategory listings of the named category in one establishment
    async fn list_category_items(
        &self,
        establishment: EstablishmentId,
        category_name: &str,
    ) -> ClientResult<Vec<CategoryListing>>;

    /// Product records filed under one category id
    async fn fetch_item_records(
        &self,
        establishment: EstablishmentId,
        category_id: i64,
    ) -> ClientResult<Vec<ItemRecord>>;

    /// Submit a single product update
    async fn patch_item(
        &self,
        item_id: i64,
        payload: &ItemUpdatePayload,
    ) -> ClientResult<PatchResponse>;
}

/// Network catalog client
#[derive(Debug, Clone)]
pub struct NetworkCatalogClient {
    client: Client,
    base_url: String,
    category_limit: u32,
    product_limit: u32,
}

impl NetworkCatalogClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        let credential = HeaderValue::from_str(&config.api_key)
            .map_err(|e| ClientError::Config(format!("API key is not a valid header value: {e}")))?;
        headers.insert(HeaderName::from_static(AUTH_HEADER), credential);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            category_limit: config.category_limit,
            product_limit: config.product_limit,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let url = self.url(path);
        tracing::debug!(url = %url, ?query, "GET");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl CatalogApi for NetworkCatalogClient {
    async fn list_establishments(&self) -> ClientResult<BTreeMap<String, EstablishmentId>> {
        let list: ObjectList<Establishment> = self
            .get(ESTABLISHMENT_PATH, &[("fields", "name,id".to_string())])
            .await?;

        Ok(list
            .objects
            .into_iter()
            .map(|establishment| (establishment.name, establishment.id))
            .collect())
    }

    async fn list_category_items(
        &self,
        establishment: EstablishmentId,
        category_name: &str,
    ) -> ClientResult<Vec<CategoryListing>> {
        let list: ObjectList<CategoryObject> = self
            .get(
                CATEGORY_PATH,
                &[
                    ("establishment", establishment.to_string()),
                    ("name", category_name.to_string()),
                    ("limit", self.category_limit.to_string()),
                ],
            )
            .await?;
        Ok(list.into_listings())
    }

    async fn fetch_item_records(
        &self,
        establishment: EstablishmentId,
        category_id: i64,
    ) -> ClientResult<Vec<ItemRecord>> {
        let list: ObjectList<ItemRecord> = self
            .get(
                PRODUCT_PATH,
                &[
                    ("establishment", establishment.to_string()),
                    ("category", category_id.to_string()),
                    ("limit", self.product_limit.to_string()),
                ],
            )
            .await?;
        Ok(list.objects)
    }

    async fn patch_item(
        &self,
        item_id: i64,
        payload: &ItemUpdatePayload,
    ) -> ClientResult<PatchResponse> {
        let url = self.url(&format!("{PRODUCT_PATH}{item_id}/"));
        tracing::debug!(url = %url, "PATCH");

        let response = self.client.patch(&url).json(payload).send().await?;
        let status_code = response.status().as_u16();
        let body = response.text().await?;

        Ok(PatchResponse { status_code, body })
    }
}
