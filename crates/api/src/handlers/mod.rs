//! Request handlers for the catalog resources.
//!
//! Handlers extract path, query and body, delegate to
//! [`CatalogService`](crate::service::CatalogService) and wrap successful
//! results in a [`DataResponse`](crate::response::DataResponse). Errors map
//! through [`AppError`](crate::error::AppError).

pub mod category;
pub mod product;
