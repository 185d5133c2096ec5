//! Read-only queries for restaurants, products and the restaurant menu.

use foodcart_core::{Catalog, MenuAvailability, Product, Restaurant};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
struct RestaurantRow {
    id: i64,
    name: String,
    address: String,
    contact_phone: String,
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            contact_phone: row.contact_phone,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    category: Option<String>,
    price: Decimal,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            price: row.price,
        }
    }
}

/// Returns every restaurant ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_restaurants(pool: &PgPool) -> Result<Vec<Restaurant>, DbError> {
    let rows = sqlx::query_as::<_, RestaurantRow>(
        "SELECT id, name, address, contact_phone \
         FROM restaurants \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Restaurant::from).collect())
}

/// Returns every product with its category name, ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(pool: &PgPool) -> Result<Vec<Product>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT p.id, p.name, c.name AS category, p.price \
         FROM products p \
         LEFT JOIN product_categories c ON c.id = p.category_id \
         ORDER BY p.id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Product::from).collect())
}

/// Returns the products at least one restaurant currently offers, ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_available_products(pool: &PgPool) -> Result<Vec<Product>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT p.id, p.name, c.name AS category, p.price \
         FROM products p \
         LEFT JOIN product_categories c ON c.id = p.category_id \
         WHERE EXISTS ( \
             SELECT 1 FROM restaurant_menu_items m \
             WHERE m.product_id = p.id AND m.availability \
         ) \
         ORDER BY p.id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Product::from).collect())
}

/// Returns every menu record, available or not.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_menu_items(pool: &PgPool) -> Result<Vec<MenuAvailability>, DbError> {
    let rows = sqlx::query_as::<_, (i64, i64, bool)>(
        "SELECT restaurant_id, product_id, availability \
         FROM restaurant_menu_items \
         ORDER BY restaurant_id, product_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(restaurant_id, product_id, availability)| MenuAvailability {
            restaurant_id,
            product_id,
            availability,
        })
        .collect())
}

/// Loads a full [`Catalog`] snapshot.
///
/// The three reads are independent; a concurrent menu edit between them can
/// at worst surface a record for a restaurant or product the snapshot does
/// not list, which the matcher ignores.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any query fails.
pub async fn load_catalog(pool: &PgPool) -> Result<Catalog, DbError> {
    let restaurants = list_restaurants(pool).await?;
    let products = list_products(pool).await?;
    let menu = list_menu_items(pool).await?;

    Ok(Catalog {
        restaurants,
        products,
        menu,
    })
}
