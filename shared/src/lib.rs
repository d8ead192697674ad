//! Shared types for the upcharge workspace
//!
//! Catalog models used by the remote client, the patch pipeline and the
//! mock catalog server.

pub mod models;

// Re-exports
pub use models::{
    CategoryListing, Establishment, EstablishmentId, FieldValue, ItemRecord, ItemUpdatePayload,
    PATCH_ACCEPTED, PatchOutcome, PatchResponse,
};
pub use serde::{Deserialize, Serialize};
