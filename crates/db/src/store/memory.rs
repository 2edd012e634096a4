use async_trait::async_trait;
use catalog_core::category::category_names_match;
use catalog_core::types::DbId;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{CatalogStore, CreatedProduct, StoreError};
use crate::models::category::Category;
use crate::models::product::{CategoryRef, NewProduct, Product, ProductWithCategory, UpdateProduct};

/// [`CatalogStore`] kept in process memory.
///
/// Ids start at 1 and are never reused, like a `BIGSERIAL`. Every operation
/// holds the one lock for its whole duration, so create-with-category is as
/// atomic here as the PostgreSQL transaction.
#[derive(Default)]
pub struct MemoryCatalogStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    products: Vec<Product>,
    last_category_id: DbId,
    last_product_id: DbId,
}

impl Tables {
    fn category(&self, id: DbId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn category_named(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| category_names_match(&c.name, name))
    }

    fn insert_category(&mut self, name: &str) -> Category {
        self.last_category_id += 1;
        let now = Utc::now();
        let category = Category {
            id: self.last_category_id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.categories.push(category.clone());
        category
    }

    fn find_or_insert_category(&mut self, name: &str) -> (Category, bool) {
        match self.category_named(name) {
            Some(existing) => (existing.clone(), false),
            None => (self.insert_category(name), true),
        }
    }

    fn joined(&self, product: &Product) -> ProductWithCategory {
        let category_name = self
            .category(product.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        ProductWithCategory {
            product: product.clone(),
            category_name,
        }
    }
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find or create a category by name. Used to seed fixtures.
    pub async fn seed_category(&self, name: &str) -> Category {
        self.tables.lock().await.find_or_insert_category(name).0
    }

    /// Number of stored categories.
    pub async fn category_count(&self) -> usize {
        self.tables.lock().await.categories.len()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn count_products(&self) -> Result<i64, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.products.len() as i64)
    }

    async fn list_products(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductWithCategory>, StoreError> {
        let tables = self.tables.lock().await;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(0);
        // Products are appended with increasing ids, so insertion order is id order.
        Ok(tables
            .products
            .iter()
            .skip(skip)
            .take(take)
            .map(|p| tables.joined(p))
            .collect())
    }

    async fn find_product(&self, id: DbId) -> Result<Option<Product>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_product_with_category(
        &self,
        id: DbId,
    ) -> Result<Option<ProductWithCategory>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.joined(p)))
    }

    async fn create_product(&self, input: &NewProduct) -> Result<CreatedProduct, StoreError> {
        let mut tables = self.tables.lock().await;

        let (category, category_created) = match &input.category {
            CategoryRef::Named(name) => tables.find_or_insert_category(name),
            CategoryRef::Existing(id) => {
                let category = tables
                    .category(*id)
                    .cloned()
                    .ok_or(StoreError::MissingCategory(*id))?;
                (category, false)
            }
        };

        tables.last_product_id += 1;
        let now = Utc::now();
        let product = Product {
            id: tables.last_product_id,
            category_id: category.id,
            name: input.name.clone(),
            description: input.description.clone(),
            price_cents: input.price_cents,
            created_at: now,
            updated_at: now,
        };
        tables.products.push(product.clone());

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
        let mut tables = self.tables.lock().await;

        if !tables.products.iter().any(|p| p.id == id) {
            return Ok(None);
        }
        if tables.category(input.category_id).is_none() {
            return Err(StoreError::MissingCategory(input.category_id));
        }

        let Some(product) = tables.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.category_id = input.category_id;
        product.name = input.name.clone();
        product.description = input.description.clone();
        product.price_cents = input.price_cents;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        Ok(tables.products.len() < before)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let tables = self.tables.lock().await;
        let mut categories = tables.categories.clone();
        categories.sort_by_cached_key(|c| (c.name.to_lowercase(), c.id));
        Ok(categories)
    }

    async fn find_category(&self, id: DbId) -> Result<Option<Category>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.category(id).cloned())
    }
}
