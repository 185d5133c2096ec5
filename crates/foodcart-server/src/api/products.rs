use axum::{extract::State, Extension, Json};
use foodcart_core::{Product, Restaurant};
use foodcart_ranking::{availability_matrix, ProductAvailability};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

/// Column headers plus one availability row per product. Each row's flags
/// line up with `restaurants`.
#[derive(Debug, Serialize)]
pub(super) struct AvailabilityTable {
    restaurants: Vec<Restaurant>,
    products: Vec<ProductAvailability>,
}

pub(super) async fn list_product_availability(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<AvailabilityTable>>, ApiError> {
    let catalog = foodcart_db::load_catalog(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let products = availability_matrix(&catalog);
    Ok(Json(ApiResponse::new(
        AvailabilityTable {
            restaurants: catalog.restaurants,
            products,
        },
        req_id.0,
    )))
}

/// Products that at least one restaurant currently offers.
pub(super) async fn list_available_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let products = foodcart_db::list_available_products(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(products, req_id.0)))
}
