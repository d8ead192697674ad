//! Patch outcome models

use serde::{Deserialize, Serialize};

/// HTTP status the catalog answers a successful product update with
pub const PATCH_ACCEPTED: u16 = 202;

/// Raw answer to a product update. Any status is a valid answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchResponse {
    pub status_code: u16,
    pub body: String,
}

impl PatchResponse {
    pub fn is_accepted(&self) -> bool {
        self.status_code == PATCH_ACCEPTED
    }
}

/// Terminal record of one patch attempt.
///
/// `status_code` is empty when no HTTP answer was received (field coercion
/// or transport failure); `response_text` then holds the error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOutcome {
    pub product_id: String,
    pub name: String,
    pub establishment: String,
    pub category: String,
    pub status_code: Option<u16>,
    pub response_text: String,
}

impl PatchOutcome {
    /// Column names in serialization order
    pub const COLUMNS: [&'static str; 6] = [
        "product_id",
        "name",
        "establishment",
        "category",
        "status_code",
        "response_text",
    ];

    pub fn is_success(&self) -> bool {
        self.status_code == Some(PATCH_ACCEPTED)
    }
}
