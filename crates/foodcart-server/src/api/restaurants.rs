use axum::{extract::State, Extension, Json};
use foodcart_core::Restaurant;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

pub(super) async fn list_restaurants(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Restaurant>>>, ApiError> {
    let restaurants = foodcart_db::list_restaurants(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(restaurants, req_id.0)))
}
