//! Product model and write DTOs.

use catalog_core::types::{DbId, Timestamp};
use catalog_core::category::category_name_fits;
use catalog_core::validation::not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Product {
    pub id: DbId,
    pub category_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A product joined with the name of its category.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ProductWithCategory {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    pub category_name: String,
}

/// DTO for creating a product.
///
/// A non-blank `new_category_name` takes precedence over `category_id`: the
/// named category is looked up case-insensitively and created if missing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: i64,
    #[validate(range(min = 1))]
    pub category_id: Option<DbId>,
    #[validate(custom(function = "category_name_fits"))]
    pub new_category_name: Option<String>,
}

/// DTO for overwriting a product. Every mutable field is replaced.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: i64,
    #[validate(range(min = 1))]
    pub category_id: DbId,
}

/// How a new product names its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryRef {
    /// An existing category id.
    Existing(DbId),
    /// A trimmed, non-empty name to find (ignoring case) or create.
    Named(String),
}

/// A validated product insert, as handed to the store.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category: CategoryRef,
}
