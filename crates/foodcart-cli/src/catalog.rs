//! Database setup commands: migrations and catalog seeding.

use std::path::Path;

use foodcart_core::AppConfig;

/// Apply pending migrations and report how many ran.
///
/// # Errors
///
/// Returns an error if the pool cannot connect or a migration fails.
pub(crate) async fn run_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = foodcart_db::connect_pool_from_config(config).await?;
    let applied = foodcart_db::run_migrations(&pool).await?;
    println!("applied {applied} migration(s)");
    Ok(())
}

/// Load both seed files, then upsert them in one transaction.
///
/// Seed files are parsed and validated before the database is touched, so a
/// bad file never leaves a half-seeded catalog.
///
/// # Errors
///
/// Returns an error if a seed file is unreadable or invalid, or if any
/// database operation fails.
pub(crate) async fn run_seed(
    config: &AppConfig,
    restaurants_path: &Path,
    products_path: &Path,
    set_available: bool,
) -> anyhow::Result<()> {
    let restaurants = foodcart_core::load_restaurants_seed(restaurants_path)?;
    let products = foodcart_core::load_products_seed(products_path)?;
    tracing::info!(
        restaurants = restaurants.len(),
        products = products.len(),
        set_available,
        "seed files loaded"
    );

    let pool = foodcart_db::connect_pool_from_config(config).await?;
    foodcart_db::run_migrations(&pool).await?;
    let summary = foodcart_db::seed_catalog(&pool, &restaurants, &products, set_available).await?;

    println!(
        "seeded {} restaurant(s), {} product(s), {} menu item(s) made available",
        summary.restaurants, summary.products, summary.menu_items
    );
    Ok(())
}
