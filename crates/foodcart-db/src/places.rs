//! The `places` table: persistent backing for the geocode cache.

use chrono::{DateTime, Utc};
use foodcart_core::Coordinate;
use foodcart_geocoder::{CachedPlace, GeocodeStore, StoreError};
use sqlx::PgPool;

/// A row from the `places` table. Both coordinates are `NULL` for an address
/// the provider could not resolve.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlaceRow {
    pub address: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub fetched_at: DateTime<Utc>,
}

impl From<PlaceRow> for CachedPlace {
    fn from(row: PlaceRow) -> Self {
        let coordinate = match (row.lon, row.lat) {
            (Some(lon), Some(lat)) => Some(Coordinate::new(lon, lat)),
            _ => None,
        };
        Self {
            address: row.address,
            coordinate,
            fetched_at: row.fetched_at,
        }
    }
}

/// Returns the cached rows for `addresses`. Addresses without a row are absent.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_places_by_addresses(
    pool: &PgPool,
    addresses: &[String],
) -> Result<Vec<PlaceRow>, sqlx::Error> {
    if addresses.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, PlaceRow>(
        "SELECT address, lat, lon, fetched_at \
         FROM places \
         WHERE address = ANY($1)",
    )
    .bind(addresses)
    .fetch_all(pool)
    .await
}

/// Inserts places whose address has no row yet, in one round-trip.
///
/// Existing rows are never touched: the first writer for an address wins and
/// later writers are silently skipped. Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn insert_places_if_absent(
    pool: &PgPool,
    places: &[CachedPlace],
) -> Result<u64, sqlx::Error> {
    if places.is_empty() {
        return Ok(0);
    }

    let mut addresses: Vec<String> = Vec::with_capacity(places.len());
    let mut lats: Vec<Option<f64>> = Vec::with_capacity(places.len());
    let mut lons: Vec<Option<f64>> = Vec::with_capacity(places.len());
    let mut fetched_ats: Vec<DateTime<Utc>> = Vec::with_capacity(places.len());

    for place in places {
        addresses.push(place.address.clone());
        lats.push(place.coordinate.map(|c| c.lat));
        lons.push(place.coordinate.map(|c| c.lon));
        fetched_ats.push(place.fetched_at);
    }

    let result = sqlx::query(
        "INSERT INTO places (address, lat, lon, fetched_at) \
         SELECT * FROM UNNEST($1::text[], $2::float8[], $3::float8[], $4::timestamptz[]) \
         ON CONFLICT (address) DO NOTHING",
    )
    .bind(&addresses)
    .bind(&lats)
    .bind(&lons)
    .bind(&fetched_ats)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// [`GeocodeStore`] backed by the `places` table.
#[derive(Debug, Clone)]
pub struct PgGeocodeStore {
    pool: PgPool,
}

impl PgGeocodeStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl GeocodeStore for PgGeocodeStore {
    async fn get_many(&self, addresses: &[String]) -> Result<Vec<CachedPlace>, StoreError> {
        let rows = list_places_by_addresses(&self.pool, addresses)
            .await
            .map_err(StoreError::new)?;
        Ok(rows.into_iter().map(CachedPlace::from).collect())
    }

    async fn insert_if_absent(&self, places: &[CachedPlace]) -> Result<u64, StoreError> {
        insert_places_if_absent(&self.pool, places)
            .await
            .map_err(StoreError::new)
    }
}
