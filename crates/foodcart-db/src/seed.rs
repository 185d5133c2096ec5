use foodcart_core::{ProductSeed, RestaurantSeed};
use sqlx::{PgConnection, PgPool};

use crate::DbError;

/// Counts reported by [`seed_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub restaurants: usize,
    pub products: usize,
    /// Menu rows inserted or switched to available; zero unless requested.
    pub menu_items: u64,
}

/// Upsert restaurants by name. Returns the number processed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails; the batch is rolled back.
pub async fn seed_restaurants(pool: &PgPool, restaurants: &[RestaurantSeed]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let count = upsert_restaurants(&mut tx, restaurants).await?;
    tx.commit().await?;
    Ok(count)
}

/// Upsert products by name, creating categories on first sight. Returns the number processed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails; the batch is rolled back.
pub async fn seed_products(pool: &PgPool, products: &[ProductSeed]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let count = upsert_products(&mut tx, products).await?;
    tx.commit().await?;
    Ok(count)
}

/// Mark every product available in every restaurant.
///
/// Missing menu rows are created; existing unavailable rows are flipped.
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn set_all_available(pool: &PgPool) -> Result<u64, DbError> {
    let mut conn = pool.acquire().await?;
    mark_all_available(&mut conn).await
}

/// Seed restaurants and products (and optionally the full menu) in one transaction.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails; nothing is committed.
pub async fn seed_catalog(
    pool: &PgPool,
    restaurants: &[RestaurantSeed],
    products: &[ProductSeed],
    set_available: bool,
) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;

    let restaurants = upsert_restaurants(&mut tx, restaurants).await?;
    let products = upsert_products(&mut tx, products).await?;
    let menu_items = if set_available {
        mark_all_available(&mut tx).await?
    } else {
        0
    };

    tx.commit().await?;

    tracing::info!(restaurants, products, menu_items, "catalog seeded");
    Ok(SeedSummary {
        restaurants,
        products,
        menu_items,
    })
}

async fn upsert_restaurants(
    conn: &mut PgConnection,
    restaurants: &[RestaurantSeed],
) -> Result<usize, DbError> {
    for restaurant in restaurants {
        sqlx::query(
            "INSERT INTO restaurants (name, address, contact_phone) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (name) DO UPDATE SET \
                 address = EXCLUDED.address, \
                 contact_phone = EXCLUDED.contact_phone, \
                 updated_at = NOW()",
        )
        .bind(&restaurant.title)
        .bind(&restaurant.address)
        .bind(&restaurant.contact_phone)
        .execute(&mut *conn)
        .await?;
    }
    Ok(restaurants.len())
}

async fn upsert_products(conn: &mut PgConnection, products: &[ProductSeed]) -> Result<usize, DbError> {
    for product in products {
        let category_id: Option<i64> = match product.category.as_deref() {
            Some(name) if !name.trim().is_empty() => Some(
                sqlx::query_scalar(
                    "INSERT INTO product_categories (name) VALUES ($1) \
                     ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
                     RETURNING id",
                )
                .bind(name.trim())
                .fetch_one(&mut *conn)
                .await?,
            ),
            _ => None,
        };

        sqlx::query(
            "INSERT INTO products (name, category_id, price, image_path, description) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (name) DO UPDATE SET \
                 category_id = EXCLUDED.category_id, \
                 price = EXCLUDED.price, \
                 image_path = EXCLUDED.image_path, \
                 description = EXCLUDED.description, \
                 updated_at = NOW()",
        )
        .bind(&product.title)
        .bind(category_id)
        .bind(product.price)
        .bind(&product.img)
        .bind(&product.description)
        .execute(&mut *conn)
        .await?;
    }
    Ok(products.len())
}

async fn mark_all_available(conn: &mut PgConnection) -> Result<u64, DbError> {
    let result = sqlx::query(
        "INSERT INTO restaurant_menu_items (restaurant_id, product_id, availability) \
         SELECT r.id, p.id, TRUE FROM restaurants r CROSS JOIN products p \
         ON CONFLICT (restaurant_id, product_id) DO UPDATE SET availability = TRUE \
         WHERE restaurant_menu_items.availability = FALSE",
    )
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}
