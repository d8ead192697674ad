//! Wire envelopes of the catalog API
//!
//! Every collection endpoint wraps its rows in `{"objects": [...]}`.

use serde::Deserialize;
use shared::CategoryListing;

/// `{"objects": [...]}` collection envelope
#[derive(Debug, Deserialize)]
pub struct ObjectList<T> {
    #[serde(default = "Vec::new")]
    pub objects: Vec<T>,
}

/// Row of the `ProductCategory` endpoint. Only its subcategories are used.
#[derive(Debug, Deserialize)]
pub struct CategoryObject {
    #[serde(default)]
    pub subcategories: Vec<CategoryListing>,
}

impl ObjectList<CategoryObject> {
    /// Subcategories of the first matching category; none if nothing matched
    pub fn into_listings(self) -> Vec<CategoryListing> {
        self.objects
            .into_iter()
            .next()
            .map(|category| category.subcategories)
            .unwrap_or_default()
    }
}
