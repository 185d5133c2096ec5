//! Domain records, configuration, and pure geometry for the foodcart workspace.

pub mod app_config;
pub mod config;
pub mod geo;
pub mod intake;
pub mod models;
pub mod seed;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{distance_km, Coordinate, EARTH_RADIUS_KM};
pub use intake::{normalize_ru_phone, IntakeError, NewOrder, NewOrderLine, OrderForm};
pub use models::{
    Catalog, MenuAvailability, Order, OrderLine, OrderStatus, PaymentMethod, Product, ProductId,
    Restaurant, RestaurantId,
};
pub use seed::{load_products_seed, load_restaurants_seed, ProductSeed, RestaurantSeed};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seed file {path}: {source}")]
    SeedFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file {path}: {source}")]
    SeedFileParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("seed validation error: {0}")]
    Validation(String),
}
