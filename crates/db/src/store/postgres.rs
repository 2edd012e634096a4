use async_trait::async_trait;
use catalog_core::types::DbId;

use super::{CatalogStore, CreatedProduct, StoreError};
use crate::models::category::Category;
use crate::models::product::{CategoryRef, NewProduct, Product, ProductWithCategory, UpdateProduct};
use crate::repositories::{CategoryRepo, ProductRepo};
use crate::DbPool;

/// [`CatalogStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: DbPool,
}

impl PgCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn count_products(&self) -> Result<i64, StoreError> {
        Ok(ProductRepo::count(&self.pool).await?)
    }

    async fn list_products(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductWithCategory>, StoreError> {
        Ok(ProductRepo::list_page(&self.pool, limit, offset).await?)
    }

    async fn find_product(&self, id: DbId) -> Result<Option<Product>, StoreError> {
        Ok(ProductRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_product_with_category(
        &self,
        id: DbId,
    ) -> Result<Option<ProductWithCategory>, StoreError> {
        Ok(ProductRepo::find_with_category(&self.pool, id).await?)
    }

    async fn create_product(&self, input: &NewProduct) -> Result<CreatedProduct, StoreError> {
        let mut tx = self.pool.begin().await?;

        let (category, category_created) = match &input.category {
            CategoryRef::Named(name) => CategoryRepo::find_or_create_in_tx(&mut tx, name).await?,
            CategoryRef::Existing(id) => {
                let category = CategoryRepo::find_by_id_in_tx(&mut tx, *id)
                    .await?
                    .ok_or(StoreError::MissingCategory(*id))?;
                (category, false)
            }
        };

        let product = ProductRepo::create_in_tx(
            &mut tx,
            category.id,
            &input.name,
            input.description.as_deref(),
            input.price_cents,
        )
        .await?;

        tx.commit().await?;

        Ok(CreatedProduct {
            product,
            category,
            category_created,
        })
    }

    async fn update_product(
        &self,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, StoreError> {
        Ok(ProductRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_product(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(ProductRepo::delete(&self.pool, id).await?)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(CategoryRepo::list(&self.pool).await?)
    }

    async fn find_category(&self, id: DbId) -> Result<Option<Category>, StoreError> {
        Ok(CategoryRepo::find_by_id(&self.pool, id).await?)
    }
}
