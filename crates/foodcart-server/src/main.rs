mod api;
mod middleware;

use std::sync::Arc;

use foodcart_db::PgGeocodeStore;
use foodcart_geocoder::{GeocodeCache, YandexGeocoder};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(foodcart_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = foodcart_db::connect_pool_from_config(&config).await?;
    let applied = foodcart_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    if config.geocoder_api_key.is_none() {
        tracing::warn!(
            "YANDEX_GEOCODER_API_KEY not set; only cached addresses will have distances"
        );
    }

    let geocoder =
        YandexGeocoder::with_base_url(config.geocoder_timeout_secs, &config.geocoder_base_url)?;
    let cache = GeocodeCache::new(PgGeocodeStore::new(pool.clone()), geocoder)
        .with_max_concurrent(config.geocoder_max_concurrent);

    let app = build_app(AppState {
        pool,
        cache: Arc::new(cache),
        config: Arc::clone(&config),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "foodcart-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
