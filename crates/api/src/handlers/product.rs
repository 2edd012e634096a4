//! Handlers for the `/products` resource.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use catalog_core::pagination::{Page, PageRequest, DEFAULT_PAGE};
use catalog_core::types::DbId;
use catalog_db::models::product::{CreateProduct, Product, ProductWithCategory, UpdateProduct};
use catalog_db::store::CreatedProduct;

use crate::error::{body_rejection_fields, AppError, AppResult};
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::service::{CreateForm, EditForm};
use crate::state::AppState;

/// GET /api/v1/products?page=&page_size=
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> AppResult<Json<DataResponse<Page<ProductWithCategory>>>> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let request = PageRequest::new(
        params.page.unwrap_or(DEFAULT_PAGE),
        params.page_size.unwrap_or(state.config.default_page_size),
        state.config.max_page_size,
    )?;
    let page = state.catalog.list(request).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/v1/products/new
pub async fn create_form(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CreateForm>>> {
    let form = state.catalog.create_form().await?;
    Ok(Json(DataResponse::new(form)))
}

/// POST /api/v1/products
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateProduct>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedProduct>>)> {
    let input = read_form(&state, body).await?;
    let created = state.catalog.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(created))))
}

/// GET /api/v1/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProductWithCategory>>> {
    let product = state.catalog.get(id).await?;
    Ok(Json(DataResponse::new(product)))
}

/// GET /api/v1/products/{id}/edit
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EditForm>>> {
    let form = state.catalog.edit_form(id).await?;
    Ok(Json(DataResponse::new(form)))
}

/// PUT /api/v1/products/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<Json<UpdateProduct>, JsonRejection>,
) -> AppResult<Json<DataResponse<Product>>> {
    let input = read_form(&state, body).await?;
    let product = state.catalog.update(id, input).await?;
    Ok(Json(DataResponse::new(product)))
}

/// DELETE /api/v1/products/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Unwrap a product form body. A body that does not deserialize is rejected
/// like any other invalid form, with the category list attached.
async fn read_form<T>(state: &AppState, body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match body {
        Ok(Json(input)) => Ok(input),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Malformed product body");
            Err(state.catalog.reject(body_rejection_fields(&rejection)).await)
        }
    }
}
