//! Client configuration

/// Default `limit` for category lookups
pub const DEFAULT_CATEGORY_LIMIT: u32 = 40;

/// Default `limit` for product fetches
pub const DEFAULT_PRODUCT_LIMIT: u32 = 1000;

/// Client configuration for connecting to the catalog API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://example.revelup.com")
    pub base_url: String,

    /// Static API credential sent with every request
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Maximum subcategories requested per category lookup
    pub category_limit: u32,

    /// Maximum products requested per category
    pub product_limit: u32,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: 30,
            category_limit: DEFAULT_CATEGORY_LIMIT,
            product_limit: DEFAULT_PRODUCT_LIMIT,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the category lookup limit
    pub fn with_category_limit(mut self, limit: u32) -> Self {
        self.category_limit = limit;
        self
    }

    /// Set the product fetch limit
    pub fn with_product_limit(mut self, limit: u32) -> Self {
        self.product_limit = limit;
        self
    }

    /// Create a network client from this configuration
    pub fn build_client(&self) -> crate::ClientResult<crate::NetworkCatalogClient> {
        crate::NetworkCatalogClient::new(self)
    }
}
