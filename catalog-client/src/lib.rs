//! Catalog Client - HTTP client for the remote product catalog
//!
//! Stateless request functions against the establishment, category and
//! product endpoints, plus the single-product update used by the upcharge
//! correction.

pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{AUTH_HEADER, CatalogApi, NetworkCatalogClient};

// Re-export shared types for convenience
pub use shared::{
    CategoryListing, EstablishmentId, FieldValue, ItemRecord, ItemUpdatePayload, PatchResponse,
};
