//! Address geocoding behind a write-once cache.
//!
//! [`GeocodeCache::resolve`] answers address lookups from a [`GeocodeStore`]
//! first and only asks the [`GeocodeProvider`] about addresses the store has
//! never seen. Every provider outcome, including "not found" and transport
//! failures, is persisted so the same address is never looked up twice.

pub mod cache;
pub mod client;
pub mod error;
pub mod provider;
pub mod store;

mod response;

pub use cache::{GeocodeCache, DEFAULT_MAX_CONCURRENT};
pub use client::YandexGeocoder;
pub use error::{GeocoderError, StoreError};
pub use provider::GeocodeProvider;
pub use store::{CachedPlace, GeocodeStore, InMemoryGeocodeStore};
