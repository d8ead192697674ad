//! Data models
//!
//! Shared between the catalog client and the upcharge pipeline.

pub mod establishment;
pub mod patch;
pub mod product;

// Re-exports
pub use establishment::*;
pub use patch::*;
pub use product::*;
