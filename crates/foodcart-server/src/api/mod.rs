mod orders;
mod products;
mod restaurants;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use foodcart_core::AppConfig;
use foodcart_db::PgGeocodeStore;
use foodcart_geocoder::{GeocodeCache, YandexGeocoder};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

pub type PlacesCache = GeocodeCache<PgGeocodeStore, YandexGeocoder>;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub cache: Arc<PlacesCache>,
    pub config: Arc<AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &foodcart_db::DbError) -> ApiError {
    if let foodcart_db::DbError::NotFound { .. } = error {
        return ApiError::new(request_id, "not_found", error.to_string());
    }
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route(
            "/api/v1/orders",
            get(orders::list_ranked_orders).post(orders::register_order),
        )
        .route("/api/v1/restaurants", get(restaurants::list_restaurants))
        .route("/api/v1/products", get(products::list_available_products))
        .route(
            "/api/v1/products/availability",
            get(products::list_product_availability),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    match foodcart_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::new(
                HealthData {
                    status: "ok",
                    database: "ok",
                },
                req_id.0,
            )),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::new(
                    HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    req_id.0,
                )),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
