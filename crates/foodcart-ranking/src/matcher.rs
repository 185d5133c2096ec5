//! Which restaurants can cook a whole order.

use std::collections::{BTreeSet, HashMap};

use foodcart_core::{MenuAvailability, OrderLine, ProductId, RestaurantId};

/// Product → restaurants currently offering it.
///
/// Built once per batch from the menu snapshot; records with
/// `availability = false` are dropped.
#[derive(Debug, Clone, Default)]
pub struct MenuIndex {
    offered_by: HashMap<ProductId, BTreeSet<RestaurantId>>,
}

impl MenuIndex {
    #[must_use]
    pub fn new(menu: &[MenuAvailability]) -> Self {
        let mut offered_by: HashMap<ProductId, BTreeSet<RestaurantId>> = HashMap::new();
        for item in menu.iter().filter(|item| item.availability) {
            offered_by
                .entry(item.product_id)
                .or_default()
                .insert(item.restaurant_id);
        }
        Self { offered_by }
    }

    /// Restaurants offering `product_id`, ascending by id.
    pub fn restaurants_offering(
        &self,
        product_id: ProductId,
    ) -> impl Iterator<Item = RestaurantId> + '_ {
        self.offered_by
            .get(&product_id)
            .into_iter()
            .flat_map(|restaurants| restaurants.iter().copied())
    }
}

/// Restaurants offering every distinct product in `lines`.
///
/// Each restaurant gets one tally point per distinct ordered product it has
/// available; only restaurants whose tally reaches the number of distinct
/// products qualify. Quantities are irrelevant. An order without lines, or
/// with a product nobody offers, matches nothing.
#[must_use]
pub fn match_restaurants(lines: &[OrderLine], index: &MenuIndex) -> BTreeSet<RestaurantId> {
    let products: BTreeSet<ProductId> = lines.iter().map(|line| line.product_id).collect();

    let mut tally: HashMap<RestaurantId, usize> = HashMap::new();
    for &product_id in &products {
        for restaurant_id in index.restaurants_offering(product_id) {
            *tally.entry(restaurant_id).or_default() += 1;
        }
    }

    tally
        .into_iter()
        .filter(|&(_, count)| count == products.len())
        .map(|(restaurant_id, _)| restaurant_id)
        .collect()
}
