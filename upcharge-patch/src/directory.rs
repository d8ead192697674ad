//! Establishment name/id mapping
//!
//! Fetched once and passed explicitly to whoever needs to turn operator
//! selections (names, "all") into establishment ids.

use catalog_client::{CatalogApi, ClientResult};
use shared::EstablishmentId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstablishmentDirectory {
    by_name: BTreeMap<String, EstablishmentId>,
}

impl EstablishmentDirectory {
    pub fn new(by_name: BTreeMap<String, EstablishmentId>) -> Self {
        Self { by_name }
    }

    pub async fn fetch<C: CatalogApi + ?Sized>(client: &C) -> ClientResult<Self> {
        let by_name = client.list_establishments().await?;
        tracing::info!(establishments = by_name.len(), "Establishment directory loaded");
        Ok(Self::new(by_name))
    }

    /// (name, id) pairs ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, EstablishmentId)> {
        self.by_name.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn id_of(&self, name: &str) -> Option<EstablishmentId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: EstablishmentId) -> Option<&str> {
        self.iter().find(|(_, known)| *known == id).map(|(name, _)| name)
    }

    /// Every id, in name order
    pub fn all_ids(&self) -> Vec<EstablishmentId> {
        self.by_name.values().copied().collect()
    }

    /// Ids of the given names, plus the names that are not in the directory
    pub fn resolve_names(&self, names: &[String]) -> (Vec<EstablishmentId>, Vec<String>) {
        let mut ids = Vec::new();
        let mut unknown = Vec::new();
        for name in names {
            match self.id_of(name) {
                Some(id) => ids.push(id),
                None => unknown.push(name.clone()),
            }
        }
        (ids, unknown)
    }
}
