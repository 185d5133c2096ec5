//! Write-once geocode cache.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use foodcart_core::Coordinate;
use futures::stream::{self, StreamExt};

use crate::provider::GeocodeProvider;
use crate::store::{CachedPlace, GeocodeStore};

pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Resolves addresses through a [`GeocodeStore`] in front of a [`GeocodeProvider`].
///
/// Results are cached forever, failures included: an address the provider
/// could not resolve stays unresolved until its entry is purged from the
/// store out of band.
#[derive(Debug)]
pub struct GeocodeCache<S, P> {
    store: S,
    provider: P,
    max_concurrent: usize,
}

impl<S, P> GeocodeCache<S, P>
where
    S: GeocodeStore,
    P: GeocodeProvider,
{
    pub fn new(store: S, provider: P) -> Self {
        Self {
            store,
            provider,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Caps the number of provider requests in flight during one `resolve`.
    #[must_use]
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve every address to an optional coordinate.
    ///
    /// 1. Deduplicate the request; blank addresses resolve to `None` and are never stored.
    /// 2. Read the known entries from the store in one batch.
    /// 3. Geocode each unknown address exactly once (up to `max_concurrent` at a time).
    /// 4. Persist every new outcome, successes and failures alike, insert-if-absent.
    ///
    /// Never fails. Provider errors become `None` for that address. A store
    /// read failure resolves the whole request to `None` without touching the
    /// provider; a store write failure is logged and the fresh results are
    /// still returned. With an empty `api_key` the provider is skipped and
    /// unknown addresses resolve to `None` without being stored.
    pub async fn resolve<'a, I>(
        &self,
        addresses: I,
        api_key: &str,
    ) -> HashMap<String, Option<Coordinate>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut resolved: HashMap<String, Option<Coordinate>> = HashMap::new();
        let mut wanted: BTreeSet<&str> = BTreeSet::new();

        for address in addresses {
            if address.trim().is_empty() {
                resolved.insert(address.to_string(), None);
            } else {
                wanted.insert(address);
            }
        }

        if wanted.is_empty() {
            return resolved;
        }

        let wanted: Vec<String> = wanted.into_iter().map(str::to_string).collect();

        let known = match self.store.get_many(&wanted).await {
            Ok(places) => places,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    addresses = wanted.len(),
                    "geocode store read failed; treating all addresses as unresolved"
                );
                resolved.extend(wanted.into_iter().map(|address| (address, None)));
                return resolved;
            }
        };

        for place in known {
            resolved.insert(place.address, place.coordinate);
        }

        let missing: Vec<String> = wanted
            .into_iter()
            .filter(|address| !resolved.contains_key(address))
            .collect();

        tracing::debug!(
            cached = resolved.len(),
            missing = missing.len(),
            "geocode cache lookup"
        );

        if missing.is_empty() {
            return resolved;
        }

        if api_key.is_empty() {
            tracing::warn!(
                missing = missing.len(),
                "no geocoder API key configured; leaving uncached addresses unresolved"
            );
            resolved.extend(missing.into_iter().map(|address| (address, None)));
            return resolved;
        }

        let fetched = self.fetch_missing(missing, api_key).await;

        match self.store.insert_if_absent(&fetched).await {
            Ok(inserted) => {
                let skipped = (fetched.len() as u64).saturating_sub(inserted);
                resolved.extend(
                    fetched
                        .iter()
                        .map(|place| (place.address.clone(), place.coordinate)),
                );
                if skipped > 0 {
                    tracing::debug!(
                        skipped,
                        "geocode entries already cached by a concurrent writer"
                    );
                    self.adopt_stored(&fetched, &mut resolved).await;
                }
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    places = fetched.len(),
                    "failed to persist geocode results"
                );
                resolved.extend(
                    fetched
                        .into_iter()
                        .map(|place| (place.address, place.coordinate)),
                );
            }
        }

        resolved
    }

    /// Replaces this call's outcomes with the stored entries, so that a call
    /// that lost an insert race answers with the first writer's result.
    /// On a failed re-read the fresh outcomes stay in place.
    async fn adopt_stored(
        &self,
        fetched: &[CachedPlace],
        resolved: &mut HashMap<String, Option<Coordinate>>,
    ) {
        let addresses: Vec<String> = fetched.iter().map(|place| place.address.clone()).collect();
        match self.store.get_many(&addresses).await {
            Ok(stored) => {
                for place in stored {
                    resolved.insert(place.address, place.coordinate);
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    places = addresses.len(),
                    "could not re-read geocode entries after losing an insert race"
                );
            }
        }
    }

    async fn fetch_missing(&self, missing: Vec<String>, api_key: &str) -> Vec<CachedPlace> {
        stream::iter(missing)
            .map(|address| async move {
                let coordinate = match self.provider.geocode(&address, api_key).await {
                    Ok(Some(coordinate)) => Some(coordinate),
                    Ok(None) => {
                        tracing::info!(address = %address, "geocoder found no match");
                        None
                    }
                    Err(e) => {
                        tracing::warn!(
                            address = %address,
                            error = %e,
                            "geocoding failed; caching address as unresolved"
                        );
                        None
                    }
                };
                CachedPlace {
                    address,
                    coordinate,
                    fetched_at: Utc::now(),
                }
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
