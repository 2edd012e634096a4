//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::Json;
use catalog_db::models::category::Category;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = state.catalog.list_categories().await?;
    Ok(Json(DataResponse::new(categories)))
}
