use std::collections::HashMap;
use std::sync::Mutex;

use super::*;
use crate::error::{GeocoderError, StoreError};
use crate::store::InMemoryGeocodeStore;

const KEY: &str = "test-key";

/// Provider answering from a fixed table and recording every request.
#[derive(Default)]
struct ScriptedProvider {
    found: HashMap<String, Coordinate>,
    failing: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn with_match(mut self, address: &str, lon: f64, lat: f64) -> Self {
        self.found
            .insert(address.to_string(), Coordinate::new(lon, lat));
        self
    }

    fn with_failure(mut self, address: &str) -> Self {
        self.failing.push(address.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_for(&self, address: &str) -> usize {
        self.calls().iter().filter(|a| *a == address).count()
    }
}

impl GeocodeProvider for ScriptedProvider {
    async fn geocode(
        &self,
        address: &str,
        api_key: &str,
    ) -> Result<Option<Coordinate>, GeocoderError> {
        assert_eq!(api_key, KEY);
        self.calls.lock().unwrap().push(address.to_string());
        if self.failing.iter().any(|a| a == address) {
            return Err(GeocoderError::MalformedPosition {
                address: address.to_string(),
                pos: "garbage".to_string(),
            });
        }
        Ok(self.found.get(address).copied())
    }
}

/// Store whose reads or writes can be forced to fail.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryGeocodeStore,
    fail_reads: bool,
    fail_writes: bool,
}

impl GeocodeStore for FlakyStore {
    async fn get_many(&self, addresses: &[String]) -> Result<Vec<CachedPlace>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::new("connection refused"));
        }
        self.inner.get_many(addresses).await
    }

    async fn insert_if_absent(&self, places: &[CachedPlace]) -> Result<u64, StoreError> {
        if self.fail_writes {
            return Err(StoreError::new("disk full"));
        }
        self.inner.insert_if_absent(places).await
    }
}

fn cache(provider: ScriptedProvider) -> GeocodeCache<InMemoryGeocodeStore, ScriptedProvider> {
    GeocodeCache::new(InMemoryGeocodeStore::new(), provider)
}

#[tokio::test]
async fn resolves_and_persists_successful_lookup() {
    let cache = cache(ScriptedProvider::default().with_match("Arbat 1", 37.59, 55.75));

    let resolved = cache.resolve(["Arbat 1"], KEY).await;

    assert_eq!(resolved["Arbat 1"], Some(Coordinate::new(37.59, 55.75)));
    let stored = cache.store().get("Arbat 1").expect("entry persisted");
    assert_eq!(stored.coordinate, Some(Coordinate::new(37.59, 55.75)));
}

#[tokio::test]
async fn second_resolve_is_served_from_cache() {
    let cache = cache(ScriptedProvider::default().with_match("Arbat 1", 37.59, 55.75));

    let first = cache.resolve(["Arbat 1"], KEY).await;
    let second = cache.resolve(["Arbat 1"], KEY).await;

    assert_eq!(first, second);
    assert_eq!(cache.provider.calls_for("Arbat 1"), 1);
}

#[tokio::test]
async fn provider_failure_is_cached_and_never_retried() {
    let cache = cache(ScriptedProvider::default().with_failure("Nowhere 0"));

    let first = cache.resolve(["Nowhere 0"], KEY).await;
    let second = cache.resolve(["Nowhere 0"], KEY).await;

    assert_eq!(first["Nowhere 0"], None);
    assert_eq!(second["Nowhere 0"], None);
    assert_eq!(cache.provider.calls_for("Nowhere 0"), 1);
    let stored = cache.store().get("Nowhere 0").expect("failure persisted");
    assert_eq!(stored.coordinate, None);
}

#[tokio::test]
async fn no_match_is_cached_as_unresolved() {
    let cache = cache(ScriptedProvider::default());

    let resolved = cache.resolve(["Atlantis"], KEY).await;

    assert_eq!(resolved["Atlantis"], None);
    assert!(cache.store().get("Atlantis").is_some());
}

#[tokio::test]
async fn duplicate_addresses_trigger_one_request() {
    let cache = cache(ScriptedProvider::default().with_match("Arbat 1", 37.59, 55.75));

    let resolved = cache
        .resolve(["Arbat 1", "Arbat 1", "Arbat 1"], KEY)
        .await;

    assert_eq!(resolved.len(), 1);
    assert_eq!(cache.provider.calls(), vec!["Arbat 1".to_string()]);
}

#[tokio::test]
async fn addresses_are_matched_exactly() {
    let cache = cache(
        ScriptedProvider::default()
            .with_match("Arbat 1", 37.59, 55.75)
            .with_match("arbat 1", 37.59, 55.75),
    );

    cache.resolve(["Arbat 1", "arbat 1"], KEY).await;

    assert_eq!(cache.provider.calls().len(), 2);
    assert_eq!(cache.store().len(), 2);
}

#[tokio::test]
async fn blank_address_is_unresolved_and_not_stored() {
    let cache = cache(ScriptedProvider::default());

    let resolved = cache.resolve(["", "   "], KEY).await;

    assert_eq!(resolved[""], None);
    assert_eq!(resolved["   "], None);
    assert!(cache.provider.calls().is_empty());
    assert!(cache.store().is_empty());
}

#[tokio::test]
async fn empty_api_key_skips_provider_without_caching() {
    let cache = cache(ScriptedProvider::default().with_match("Arbat 1", 37.59, 55.75));

    let resolved = cache.resolve(["Arbat 1"], "").await;

    assert_eq!(resolved["Arbat 1"], None);
    assert!(cache.provider.calls().is_empty());
    assert!(cache.store().is_empty());
}

#[tokio::test]
async fn cached_entries_resolve_without_api_key() {
    let cache = cache(ScriptedProvider::default().with_match("Arbat 1", 37.59, 55.75));
    cache.resolve(["Arbat 1"], KEY).await;

    let resolved = cache.resolve(["Arbat 1"], "").await;

    assert_eq!(resolved["Arbat 1"], Some(Coordinate::new(37.59, 55.75)));
}

#[tokio::test]
async fn store_read_failure_degrades_to_unresolved() {
    let store = FlakyStore {
        fail_reads: true,
        ..FlakyStore::default()
    };
    let provider = ScriptedProvider::default().with_match("Arbat 1", 37.59, 55.75);
    let cache = GeocodeCache::new(store, provider);

    let resolved = cache.resolve(["Arbat 1"], KEY).await;

    assert_eq!(resolved["Arbat 1"], None);
    assert!(cache.provider.calls().is_empty());
}

#[tokio::test]
async fn store_write_failure_still_returns_fresh_results() {
    let store = FlakyStore {
        fail_writes: true,
        ..FlakyStore::default()
    };
    let provider = ScriptedProvider::default().with_match("Arbat 1", 37.59, 55.75);
    let cache = GeocodeCache::new(store, provider);

    let resolved = cache.resolve(["Arbat 1"], KEY).await;

    assert_eq!(resolved["Arbat 1"], Some(Coordinate::new(37.59, 55.75)));
    assert!(cache.store().inner.is_empty());
}

#[tokio::test]
async fn concurrent_resolves_leave_a_single_entry() {
    let cache = cache(ScriptedProvider::default().with_match("Arbat 1", 37.59, 55.75));

    let (a, b) = tokio::join!(
        cache.resolve(["Arbat 1"], KEY),
        cache.resolve(["Arbat 1"], KEY)
    );

    assert_eq!(a["Arbat 1"], Some(Coordinate::new(37.59, 55.75)));
    assert_eq!(b["Arbat 1"], Some(Coordinate::new(37.59, 55.75)));
    assert_eq!(cache.store().len(), 1);
}

#[tokio::test]
async fn zero_concurrency_is_clamped_to_one() {
    let cache = cache(
        ScriptedProvider::default()
            .with_match("A", 1.0, 1.0)
            .with_match("B", 2.0, 2.0),
    )
    .with_max_concurrent(0);

    let resolved = cache.resolve(["A", "B"], KEY).await;

    assert_eq!(resolved["A"], Some(Coordinate::new(1.0, 1.0)));
    assert_eq!(resolved["B"], Some(Coordinate::new(2.0, 2.0)));
}

/// Provider that finds the address on its first call and fails afterwards,
/// yielding before it answers so concurrent callers interleave.
#[derive(Default)]
struct FirstCallOnlyProvider {
    calls: Mutex<usize>,
}

impl GeocodeProvider for FirstCallOnlyProvider {
    async fn geocode(
        &self,
        address: &str,
        _api_key: &str,
    ) -> Result<Option<Coordinate>, GeocoderError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        tokio::task::yield_now().await;
        if call == 1 {
            Ok(Some(Coordinate::new(37.59, 55.75)))
        } else {
            Err(GeocoderError::MalformedPosition {
                address: address.to_string(),
                pos: "garbage".to_string(),
            })
        }
    }
}

#[tokio::test]
async fn losing_writer_answers_with_the_stored_entry() {
    let cache = GeocodeCache::new(InMemoryGeocodeStore::new(), FirstCallOnlyProvider::default());

    let (a, b) = tokio::join!(
        cache.resolve(["Arbat 1"], KEY),
        cache.resolve(["Arbat 1"], KEY)
    );

    let stored = cache.store().get("Arbat 1").expect("entry persisted").coordinate;
    assert_eq!(a["Arbat 1"], stored);
    assert_eq!(b["Arbat 1"], stored);

    let later = cache.resolve(["Arbat 1"], KEY).await;
    assert_eq!(later["Arbat 1"], stored);
}
