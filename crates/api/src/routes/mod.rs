pub mod category;
pub mod health;
pub mod product;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /products                     list (?page=&page_size=), create
/// /products/new                 create form context
/// /products/{id}                get, update, delete
/// /products/{id}/edit           edit form context
///
/// /categories                   list
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product::router())
        .nest("/categories", category::router())
}
