//! Postgres access for foodcart: pool setup, migrations, the catalog and
//! order reads, order intake, and the `places` geocode cache.

use foodcart_core::AppConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Path relative to crates/foodcart-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("invalid {column} value '{value}' in row {id}")]
    InvalidValue {
        column: &'static str,
        value: String,
        id: i64,
    },
    #[error("schema is not migrated: table {0} is missing")]
    SchemaNotMigrated(&'static str),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Connect to a Postgres pool using explicit URL and config.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Connect using the URL and pool settings carried by [`AppConfig`].
///
/// # Errors
///
/// Returns [`DbError::MissingDatabaseUrl`] if no URL is configured, or
/// [`DbError::Sqlx`] if the connection cannot be established.
pub async fn connect_pool_from_config(config: &AppConfig) -> Result<PgPool, DbError> {
    let database_url = config
        .database_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or(DbError::MissingDatabaseUrl)?;
    connect_pool(database_url, PoolConfig::from_app_config(config))
        .await
        .map_err(DbError::from)
}

/// Run all pending migrations against the pool.
///
/// Returns the number of migrations that were applied. Each newly applied
/// version is logged with its description, so `foodcart-cli migrate` shows
/// whether the `places` cache table or the catalog schema changed.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, sqlx::migrate::MigrateError> {
    let before = applied_versions(pool).await;
    MIGRATOR.run(pool).await?;
    let after = applied_versions(pool).await;

    let fresh: Vec<&sqlx::migrate::Migration> = MIGRATOR
        .iter()
        .filter(|m| after.contains(&m.version) && !before.contains(&m.version))
        .collect();
    for migration in &fresh {
        tracing::info!(
            version = migration.version,
            description = %migration.description,
            "applied migration"
        );
    }
    if fresh.is_empty() {
        tracing::debug!(known = MIGRATOR.iter().count(), "schema already up to date");
    }
    Ok(fresh.len())
}

/// Versions recorded as successfully applied.
///
/// `_sqlx_migrations` does not exist on a fresh database; that reads as none.
async fn applied_versions(pool: &PgPool) -> Vec<i64> {
    sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success = true")
        .fetch_all(pool)
        .await
        .unwrap_or_default()
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Tables the server reads on every ranking request.
const REQUIRED_TABLES: [&str; 4] = ["restaurants", "restaurant_menu_items", "orders", "places"];

/// Ping the pool and confirm the ranking tables exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the database is unreachable, or
/// [`DbError::SchemaNotMigrated`] naming the first missing table.
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    ping(pool).await?;
    for table in REQUIRED_TABLES {
        let present: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
            .bind(table)
            .fetch_one(pool)
            .await?;
        if !present {
            return Err(DbError::SchemaNotMigrated(table));
        }
    }
    Ok(())
}


pub mod catalog;
pub mod orders;
pub mod places;
pub mod seed;

pub use catalog::{
    list_available_products, list_menu_items, list_products, list_restaurants, load_catalog,
};
pub use orders::{insert_order, list_pending_orders, OrderLineRow, OrderRow};
pub use places::{insert_places_if_absent, list_places_by_addresses, PgGeocodeStore, PlaceRow};
pub use seed::{seed_catalog, seed_products, seed_restaurants, set_all_available, SeedSummary};
