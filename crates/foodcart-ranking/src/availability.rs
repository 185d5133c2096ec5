//! Product × restaurant availability grid for the menu overview.

use std::collections::HashMap;

use foodcart_core::{Catalog, Product, ProductId, RestaurantId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductAvailability {
    pub product: Product,
    /// One flag per restaurant, in catalog restaurant order. Missing menu
    /// records read as `false`.
    pub availability: Vec<bool>,
}

#[must_use]
pub fn availability_matrix(catalog: &Catalog) -> Vec<ProductAvailability> {
    let flags: HashMap<(ProductId, RestaurantId), bool> = catalog
        .menu
        .iter()
        .map(|item| ((item.product_id, item.restaurant_id), item.availability))
        .collect();

    catalog
        .products
        .iter()
        .map(|product| ProductAvailability {
            product: product.clone(),
            availability: catalog
                .restaurants
                .iter()
                .map(|restaurant| {
                    flags
                        .get(&(product.id, restaurant.id))
                        .copied()
                        .unwrap_or(false)
                })
                .collect(),
        })
        .collect()
}
