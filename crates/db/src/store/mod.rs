//! The storage seam used by the catalog service.
//!
//! [`CatalogStore`] lists every read and write the service performs. The
//! PostgreSQL implementation delegates to the repositories; the in-memory one
//! keeps both tables behind a single lock and backs tests and database-less
//! local runs.

use async_trait::async_trait;
use catalog_core::types::DbId;
use serde::Serialize;

use crate::models::category::Category;
use crate::models::product::{NewProduct, Product, ProductWithCategory, UpdateProduct};

pub mod memory;
pub mod postgres;

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

/// Errors raised by a [`CatalogStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A write referenced a category that does not exist.
    #[error("Category {0} does not exist")]
    MissingCategory(DbId),
}

/// Result of [`CatalogStore::create_product`].
#[derive(Debug, Clone, Serialize)]
pub struct CreatedProduct {
    pub product: Product,
    pub category: Category,
    /// Whether the category was inserted by this call.
    pub category_created: bool,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Short label for logs (`postgres`, `memory`).
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), StoreError>;

    async fn count_products(&self) -> Result<i64, StoreError>;

    /// Products ordered by id, skipping `offset` and taking at most `limit`.
    async fn list_products(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductWithCategory>, StoreError>;

    async fn find_product(&self, id: DbId) -> Result<Option<Product>, StoreError>;

    async fn find_product_with_category(
        &self,
        id: DbId,
    ) -> Result<Option<ProductWithCategory>, StoreError>;

    /// Resolve the category and insert the product atomically: either both
    /// writes land or neither does.
    async fn create_product(&self, input: &NewProduct) -> Result<CreatedProduct, StoreError>;

    /// Overwrite a product. `None` when the id does not exist.
    async fn update_product(
        &self,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, StoreError>;

    /// `true` when a row was removed.
    async fn delete_product(&self, id: DbId) -> Result<bool, StoreError>;

    /// All categories ordered by name ignoring case, then id.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn find_category(&self, id: DbId) -> Result<Option<Category>, StoreError>;
}
