//! Geocoding and ranking commands.

use foodcart_core::{AppConfig, Coordinate};
use foodcart_db::PgGeocodeStore;
use foodcart_geocoder::{
    GeocodeCache, GeocodeProvider, GeocodeStore, InMemoryGeocodeStore, YandexGeocoder,
};

fn build_geocoder(config: &AppConfig) -> anyhow::Result<YandexGeocoder> {
    if config.geocoder_api_key.is_none() {
        tracing::warn!("YANDEX_GEOCODER_API_KEY not set; only cached addresses will resolve");
    }
    Ok(YandexGeocoder::with_base_url(
        config.geocoder_timeout_secs,
        &config.geocoder_base_url,
    )?)
}

/// Resolve `addresses` and print one tab-separated line per input address.
///
/// # Errors
///
/// Returns an error if the geocoder client cannot be built or the pool
/// cannot connect. Lookup failures are printed as `unresolved`.
pub(crate) async fn run_geocode(
    config: &AppConfig,
    addresses: &[String],
    no_store: bool,
) -> anyhow::Result<()> {
    let geocoder = build_geocoder(config)?;

    if no_store {
        let cache = GeocodeCache::new(InMemoryGeocodeStore::new(), geocoder)
            .with_max_concurrent(config.geocoder_max_concurrent);
        print_resolved(&cache, addresses, config.geocoder_api_key_or_empty()).await;
    } else {
        let pool = foodcart_db::connect_pool_from_config(config).await?;
        let cache = GeocodeCache::new(PgGeocodeStore::new(pool), geocoder)
            .with_max_concurrent(config.geocoder_max_concurrent);
        print_resolved(&cache, addresses, config.geocoder_api_key_or_empty()).await;
    }
    Ok(())
}

async fn print_resolved<S, P>(cache: &GeocodeCache<S, P>, addresses: &[String], api_key: &str)
where
    S: GeocodeStore,
    P: GeocodeProvider,
{
    let resolved = cache
        .resolve(addresses.iter().map(String::as_str), api_key)
        .await;

    for address in addresses {
        let coordinate = resolved.get(address).copied().flatten();
        println!("{}", format_resolved(address, coordinate));
    }
}

fn format_resolved(address: &str, coordinate: Option<Coordinate>) -> String {
    match coordinate {
        Some(c) => format!("{address}\t{:.6} {:.6}", c.lon, c.lat),
        None => format!("{address}\tunresolved"),
    }
}

/// Rank every pending order and print the result as JSON.
///
/// # Errors
///
/// Returns an error if the pool cannot connect, a snapshot query fails, or
/// the output cannot be serialized.
pub(crate) async fn run_rank(config: &AppConfig, pretty: bool) -> anyhow::Result<()> {
    let pool = foodcart_db::connect_pool_from_config(config).await?;
    let catalog = foodcart_db::load_catalog(&pool).await?;
    let orders = foodcart_db::list_pending_orders(&pool).await?;
    tracing::info!(
        orders = orders.len(),
        restaurants = catalog.restaurants.len(),
        "snapshot loaded"
    );

    let cache = GeocodeCache::new(PgGeocodeStore::new(pool), build_geocoder(config)?)
        .with_max_concurrent(config.geocoder_max_concurrent);
    let ranked = foodcart_ranking::enrich(
        &orders,
        &catalog,
        &cache,
        config.geocoder_api_key_or_empty(),
    )
    .await;

    let json = if pretty {
        serde_json::to_string_pretty(&ranked)?
    } else {
        serde_json::to_string(&ranked)?
    };
    println!("{json}");
    Ok(())
}
