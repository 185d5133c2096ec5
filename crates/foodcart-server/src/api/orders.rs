use axum::{body::Bytes, extract::State, http::StatusCode, Extension, Json};
use foodcart_core::{Order, OrderForm};
use foodcart_ranking::RankedOrder;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

/// Pending orders, each with the restaurants able to fulfil it, nearest first.
///
/// Geocoding problems never fail the request; affected distances are `null`.
pub(super) async fn list_ranked_orders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<RankedOrder>>>, ApiError> {
    let catalog = foodcart_db::load_catalog(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let orders = foodcart_db::list_pending_orders(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let ranked = foodcart_ranking::enrich(
        &orders,
        &catalog,
        state.cache.as_ref(),
        state.config.geocoder_api_key_or_empty(),
    )
    .await;

    tracing::debug!(orders = ranked.len(), "ranked pending orders");
    Ok(Json(ApiResponse::new(ranked, req_id.0)))
}

#[derive(Debug, Serialize)]
pub(super) struct RegisteredOrder {
    #[serde(flatten)]
    order: Order,
    total_cost: Decimal,
}

/// Accepts an order form, prices each line at the product's current price,
/// and stores it as `not_processed`.
///
/// The body is parsed by hand so that malformed JSON gets the same
/// `bad_request` envelope as a failed validation.
pub(super) async fn register_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<RegisteredOrder>>), ApiError> {
    let form: OrderForm = serde_json::from_slice(&body).map_err(|e| {
        ApiError::new(
            req_id.0.clone(),
            "bad_request",
            format!("invalid order body: {e}"),
        )
    })?;
    let new_order = form
        .validate()
        .map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.to_string()))?;

    let order = foodcart_db::insert_order(&state.pool, &new_order)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let total_cost = order.total_cost();
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(RegisteredOrder { order, total_cost }, req_id.0)),
    ))
}
