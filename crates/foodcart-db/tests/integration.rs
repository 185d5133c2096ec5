//! Offline tests for foodcart-db pool configuration and row mapping.
//! These tests do not require a live database connection.

use chrono::Utc;
use foodcart_core::{AppConfig, Environment, OrderLine, OrderStatus, PaymentMethod};
use foodcart_db::{DbError, OrderLineRow, OrderRow, PlaceRow, PoolConfig};
use foodcart_geocoder::CachedPlace;
use rust_decimal::Decimal;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: Some("postgres://example".to_string()),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        geocoder_api_key: None,
        geocoder_base_url: "https://geocode-maps.yandex.ru/".to_string(),
        geocoder_timeout_secs: 10,
        geocoder_max_concurrent: 4,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    }
}

fn order_row(status: &str, payment_method: &str) -> OrderRow {
    OrderRow {
        id: 11,
        firstname: "Anna".to_string(),
        lastname: "Ivanova".to_string(),
        phonenumber: "+79001112233".to_string(),
        address: "Moscow, Arbat 10".to_string(),
        status: status.to_string(),
        payment_method: payment_method.to_string(),
        comment: String::new(),
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[tokio::test]
async fn missing_database_url_is_rejected_before_connecting() {
    let mut config = app_config();
    config.database_url = None;

    let err = foodcart_db::connect_pool_from_config(&config)
        .await
        .expect_err("blank url must fail");
    assert!(matches!(err, DbError::MissingDatabaseUrl));
}

#[test]
fn order_row_maps_codes_to_enums() {
    let lines = vec![OrderLine {
        product_id: 3,
        quantity: 2,
        price: Decimal::new(19_900, 2),
    }];

    let order = order_row("processed", "card_online")
        .into_order(lines)
        .expect("known codes");

    assert_eq!(order.id, 11);
    assert_eq!(order.status, OrderStatus::Processed);
    assert_eq!(order.payment_method, PaymentMethod::CardOnline);
    assert_eq!(order.total_cost(), Decimal::new(39_800, 2));
}

#[test]
fn unknown_status_code_is_reported_with_row_id() {
    let err = order_row("lost", "cash")
        .into_order(Vec::new())
        .expect_err("unknown status");

    match err {
        DbError::InvalidValue { column, value, id } => {
            assert_eq!(column, "orders.status");
            assert_eq!(value, "lost");
            assert_eq!(id, 11);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn negative_quantity_is_rejected() {
    let row = OrderLineRow {
        order_id: 4,
        product_id: 1,
        quantity: -1,
        price: Decimal::ONE,
    };
    assert!(matches!(
        OrderLine::try_from(row),
        Err(DbError::InvalidValue { column: "order_items.quantity", .. })
    ));
}

#[test]
fn place_row_with_null_coordinates_is_a_cached_failure() {
    let place = CachedPlace::from(PlaceRow {
        address: "Nowhere".to_string(),
        lat: None,
        lon: None,
        fetched_at: Utc::now(),
    });
    assert!(place.coordinate.is_none());
}

#[test]
fn place_row_maps_lat_lon_into_coordinate() {
    let place = CachedPlace::from(PlaceRow {
        address: "Moscow, Red Square 1".to_string(),
        lat: Some(55.7539),
        lon: Some(37.6208),
        fetched_at: Utc::now(),
    });
    let coordinate = place.coordinate.expect("coordinate");
    assert!((coordinate.lon - 37.6208).abs() < f64::EPSILON);
    assert!((coordinate.lat - 55.7539).abs() < f64::EPSILON);
}
