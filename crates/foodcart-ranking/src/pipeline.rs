//! Batch enrichment: match, geocode once, measure, rank.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::iter;

use foodcart_core::{distance_km, Catalog, Coordinate, Order};
use foodcart_geocoder::{GeocodeCache, GeocodeProvider, GeocodeStore};

use crate::matcher::{match_restaurants, MenuIndex};
use crate::types::{CandidateRestaurant, RankedOrder};

/// Rank candidate restaurants for every order in the batch.
///
/// 1. Match each order against the menu snapshot; candidates keep catalog order.
/// 2. Resolve every order address and the addresses of matched candidate
///    restaurants in a single [`GeocodeCache::resolve`] call. Restaurants
///    that can fulfil none of the orders are left out and never geocoded.
/// 3. Attach the great-circle distance between order and restaurant.
/// 4. Stable-sort candidates nearest first, unknown distances last.
///
/// The result is ordered by order id. Geocoding problems only ever turn
/// distances into `None`; the batch itself cannot fail.
pub async fn enrich<S, P>(
    orders: &[Order],
    catalog: &Catalog,
    cache: &GeocodeCache<S, P>,
    api_key: &str,
) -> Vec<RankedOrder>
where
    S: GeocodeStore,
    P: GeocodeProvider,
{
    let index = MenuIndex::new(&catalog.menu);

    let matched: Vec<(&Order, Vec<CandidateRestaurant>)> = orders
        .iter()
        .map(|order| {
            let restaurant_ids = match_restaurants(&order.lines, &index);
            let candidates: Vec<CandidateRestaurant> = catalog
                .restaurants
                .iter()
                .filter(|restaurant| restaurant_ids.contains(&restaurant.id))
                .map(CandidateRestaurant::from_restaurant)
                .collect();
            if candidates.is_empty() {
                tracing::debug!(order_id = order.id, "no restaurant can fulfil order");
            }
            (order, candidates)
        })
        .collect();

    let addresses: BTreeSet<&str> = matched
        .iter()
        .flat_map(|(order, candidates)| {
            iter::once(order.address.as_str())
                .chain(candidates.iter().map(|c| c.address.as_str()))
        })
        .collect();

    tracing::info!(
        orders = orders.len(),
        addresses = addresses.len(),
        "resolving addresses for order batch"
    );

    let coordinates = cache.resolve(addresses, api_key).await;

    let mut ranked: Vec<RankedOrder> = matched
        .into_iter()
        .map(|(order, mut candidates)| {
            let origin = lookup(&coordinates, &order.address);
            for candidate in &mut candidates {
                candidate.distance_km = distance_km(origin, lookup(&coordinates, &candidate.address));
            }
            RankedOrder::new(order, rank_restaurants(candidates))
        })
        .collect();

    ranked.sort_by_key(|order| order.id);
    ranked
}

fn lookup(coordinates: &HashMap<String, Option<Coordinate>>, address: &str) -> Option<Coordinate> {
    coordinates.get(address).copied().flatten()
}

/// Orders distances ascending with unknown distances after every known one.
#[must_use]
pub fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by [`compare_distance`]; ties keep their incoming order.
#[must_use]
pub fn rank_restaurants(mut candidates: Vec<CandidateRestaurant>) -> Vec<CandidateRestaurant> {
    candidates.sort_by(|a, b| compare_distance(a.distance_km, b.distance_km));
    candidates
}
