//! Persistence seam for resolved addresses.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use foodcart_core::Coordinate;

use crate::error::StoreError;

/// One cached geocoding outcome. `coordinate` is `None` when the address
/// could not be resolved; that outcome is cached like any other.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPlace {
    pub address: String,
    pub coordinate: Option<Coordinate>,
    pub fetched_at: DateTime<Utc>,
}

/// Key-value store of [`CachedPlace`] entries keyed by exact address text.
///
/// Entries are write-once: `insert_if_absent` must leave an existing entry
/// untouched and must not fail when another writer got there first.
pub trait GeocodeStore: Sync {
    /// Returns the entries that exist for `addresses`; unknown addresses are
    /// simply absent from the result.
    fn get_many(
        &self,
        addresses: &[String],
    ) -> impl Future<Output = Result<Vec<CachedPlace>, StoreError>> + Send;

    /// Inserts each place whose address has no entry yet and returns how many
    /// rows were actually written.
    fn insert_if_absent(
        &self,
        places: &[CachedPlace],
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

/// Process-local store, used by tests and by the CLI when no database is wanted.
#[derive(Debug, Default)]
pub struct InMemoryGeocodeStore {
    places: Mutex<HashMap<String, CachedPlace>>,
}

impl InMemoryGeocodeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a single entry.
    #[must_use]
    pub fn get(&self, address: &str) -> Option<CachedPlace> {
        self.lock().get(address).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CachedPlace>> {
        // A poisoned map is still structurally valid: entries are only ever inserted whole.
        self.places
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl GeocodeStore for InMemoryGeocodeStore {
    async fn get_many(&self, addresses: &[String]) -> Result<Vec<CachedPlace>, StoreError> {
        let places = self.lock();
        Ok(addresses
            .iter()
            .filter_map(|address| places.get(address).cloned())
            .collect())
    }

    async fn insert_if_absent(&self, places: &[CachedPlace]) -> Result<u64, StoreError> {
        let mut stored = self.lock();
        let mut inserted = 0u64;
        for place in places {
            if !stored.contains_key(&place.address) {
                stored.insert(place.address.clone(), place.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}
