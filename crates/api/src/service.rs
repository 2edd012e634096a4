//! Catalog business logic.
//!
//! [`CatalogService`] sits between the HTTP handlers and a [`CatalogStore`].
//! It owns pagination, category resolution for new products, validation
//! before any write, and the not-found rules. Handlers only translate HTTP
//! in and out.

use std::sync::Arc;

use catalog_core::category::normalize_category_name;
use catalog_core::error::CoreError;
use catalog_core::pagination::{Page, PageRequest};
use catalog_core::types::DbId;
use catalog_core::validation::{field_errors, push_field_error, FieldErrors};
use catalog_db::models::category::Category;
use catalog_db::models::product::{
    CategoryRef, CreateProduct, NewProduct, Product, ProductWithCategory, UpdateProduct,
};
use catalog_db::store::{CatalogStore, CreatedProduct};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult, FormRejection};

/// What a create form needs to render.
#[derive(Debug, Serialize)]
pub struct CreateForm {
    pub categories: Vec<Category>,
}

/// What an edit form needs to render.
#[derive(Debug, Serialize)]
pub struct EditForm {
    pub product: Product,
    pub categories: Vec<Category>,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Label of the underlying store.
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Whether the underlying store answers.
    pub async fn is_healthy(&self) -> bool {
        match self.store.health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, backend = self.backend(), "Store health check failed");
                false
            }
        }
    }

    /// One page of products with their category names.
    ///
    /// A page past the end is returned empty, never as an error.
    pub async fn list(&self, request: PageRequest) -> AppResult<Page<ProductWithCategory>> {
        let total = self.store.count_products().await?;
        let items = self
            .store
            .list_products(request.limit(), request.offset())
            .await?;
        let page = Page::new(items, total, request);

        if page.is_past_end() && total > 0 {
            tracing::debug!(
                page = page.current_page,
                total_pages = page.total_pages,
                "Requested page is past the last page"
            );
        }
        Ok(page)
    }

    pub async fn get(&self, id: DbId) -> AppResult<ProductWithCategory> {
        self.store
            .find_product_with_category(id)
            .await?
            .ok_or_else(|| product_not_found(id))
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        Ok(self.store.list_categories().await?)
    }

    pub async fn create_form(&self) -> AppResult<CreateForm> {
        Ok(CreateForm {
            categories: self.store.list_categories().await?,
        })
    }

    pub async fn edit_form(&self, id: DbId) -> AppResult<EditForm> {
        let product = self
            .store
            .find_product(id)
            .await?
            .ok_or_else(|| product_not_found(id))?;
        Ok(EditForm {
            product,
            categories: self.store.list_categories().await?,
        })
    }

    /// Create a product, resolving or creating its category.
    ///
    /// A non-blank `new_category_name` wins over `category_id`. Validation
    /// runs first and a failure writes nothing. The category lookup/insert
    /// and the product insert happen in one store transaction.
    pub async fn create(&self, input: CreateProduct) -> AppResult<CreatedProduct> {
        let mut fields = validate(&input);

        let new_category_name = normalize_category_name(input.new_category_name.as_deref());
        let category = match (new_category_name, input.category_id) {
            (Some(name), _) => {
                // The selected id is ignored, so its errors are too.
                fields.remove("category_id");
                Some(CategoryRef::Named(name))
            }
            (None, Some(id)) => Some(CategoryRef::Existing(id)),
            (None, None) => {
                push_field_error(
                    &mut fields,
                    "category_id",
                    "select a category or enter a new category name",
                );
                None
            }
        };

        if let Some(CategoryRef::Existing(id)) = &category {
            if !fields.contains_key("category_id") {
                self.check_category_exists(*id, &mut fields).await?;
            }
        }

        let category = match category {
            Some(category) if fields.is_empty() => category,
            _ => return Err(self.reject(fields).await),
        };

        if let CategoryRef::Named(name) = &category {
            tracing::debug!(category_name = %name, "Resolving category by name");
        }

        let new_product = NewProduct {
            name: input.name,
            description: input.description,
            price_cents: input.price_cents,
            category,
        };
        let created = self.store.create_product(&new_product).await?;

        tracing::info!(
            product_id = created.product.id,
            category_id = created.category.id,
            category_created = created.category_created,
            "Product created"
        );
        Ok(created)
    }

    /// Overwrite every mutable field of a product (last write wins).
    pub async fn update(&self, id: DbId, input: UpdateProduct) -> AppResult<Product> {
        let mut fields = validate(&input);
        if !fields.contains_key("category_id") {
            self.check_category_exists(input.category_id, &mut fields)
                .await?;
        }
        if !fields.is_empty() {
            return Err(self.reject(fields).await);
        }

        let product = self
            .store
            .update_product(id, &input)
            .await?
            .ok_or_else(|| product_not_found(id))?;

        tracing::info!(product_id = id, category_id = product.category_id, "Product updated");
        Ok(product)
    }

    /// Delete a product. Its category is left in place.
    pub async fn delete(&self, id: DbId) -> AppResult<()> {
        if !self.store.delete_product(id).await? {
            return Err(product_not_found(id));
        }
        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }

    async fn check_category_exists(&self, id: DbId, fields: &mut FieldErrors) -> AppResult<()> {
        if self.store.find_category(id).await?.is_none() {
            push_field_error(fields, "category_id", format!("category {id} does not exist"));
        }
        Ok(())
    }

    /// Build the validation error, attaching the category list for redisplay.
    pub async fn reject(&self, fields: FieldErrors) -> AppError {
        tracing::debug!(fields = ?fields.keys().collect::<Vec<_>>(), "Form rejected");
        match self.store.list_categories().await {
            Ok(categories) => AppError::InvalidForm(Box::new(FormRejection { fields, categories })),
            Err(e) => e.into(),
        }
    }
}

fn validate(input: &impl Validate) -> FieldErrors {
    match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => field_errors(&errors),
    }
}

fn product_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Product",
        id,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use catalog_db::store::MemoryCatalogStore;

    use super::*;

    fn service() -> (CatalogService, Arc<MemoryCatalogStore>) {
        let store = Arc::new(MemoryCatalogStore::new());
        (CatalogService::new(store.clone()), store)
    }

    fn create_input(name: &str) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: None,
            price_cents: 1_000,
            category_id: None,
            new_category_name: None,
        }
    }

    fn update_input(name: &str, category_id: DbId) -> UpdateProduct {
        UpdateProduct {
            name: name.to_string(),
            description: Some("updated".to_string()),
            price_cents: 4_200,
            category_id,
        }
    }

    async fn seed_products(service: &CatalogService, category_id: DbId, n: usize) {
        for i in 0..n {
            service
                .create(CreateProduct {
                    category_id: Some(category_id),
                    ..create_input(&format!("P{i}"))
                })
                .await
                .unwrap();
        }
    }

    // -- list ----------------------------------------------------------------

    #[tokio::test]
    async fn total_pages_is_ceiling_of_count() {
        let (service, store) = service();
        let cat = store.seed_category("Misc").await;
        seed_products(&service, cat.id, 23).await;

        for size in 1..=25 {
            let page = service
                .list(PageRequest::new(1, size, 100).unwrap())
                .await
                .unwrap();
            assert_eq!(page.total_pages, (23 + size - 1) / size, "size={size}");
            assert_eq!(page.total_items, 23);
        }
    }

    #[tokio::test]
    async fn list_returns_requested_window() {
        let (service, store) = service();
        let cat = store.seed_category("Misc").await;
        seed_products(&service, cat.id, 12).await;

        let page = service
            .list(PageRequest::new(2, 5, 100).unwrap())
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|p| p.product.name.as_str()).collect();
        assert_eq!(names, ["P5", "P6", "P7", "P8", "P9"]);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn page_beyond_range_is_empty_not_error() {
        let (service, store) = service();
        let cat = store.seed_category("Misc").await;
        seed_products(&service, cat.id, 3).await;

        let page = service
            .list(PageRequest::new(9, 10, 100).unwrap())
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.current_page, 9);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn empty_catalog_has_zero_pages() {
        let (service, _) = service();
        let page = service.list(PageRequest::default()).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
    }

    // -- create --------------------------------------------------------------

    #[tokio::test]
    async fn create_with_new_name_creates_one_category() {
        let (service, store) = service();

        let created = service
            .create(CreateProduct {
                new_category_name: Some("Widgets".into()),
                ..create_input("Sprocket")
            })
            .await
            .unwrap();

        assert!(created.category_created);
        assert_eq!(created.category.name, "Widgets");
        assert_eq!(created.product.category_id, created.category.id);
        assert_eq!(store.category_count().await, 1);
    }

    #[tokio::test]
    async fn create_reuses_existing_category_ignoring_case() {
        let (service, store) = service();
        let widgets = store.seed_category("Widgets").await;

        let created = service
            .create(CreateProduct {
                new_category_name: Some("widgets".into()),
                ..create_input("Sprocket")
            })
            .await
            .unwrap();

        assert!(!created.category_created);
        assert_eq!(created.product.category_id, widgets.id);
        assert_eq!(store.category_count().await, 1);
    }

    #[tokio::test]
    async fn new_category_name_overrides_selected_id() {
        let (service, store) = service();
        let tools = store.seed_category("Tools").await;

        let created = service
            .create(CreateProduct {
                category_id: Some(tools.id),
                new_category_name: Some("  Garden ".into()),
                ..create_input("Rake")
            })
            .await
            .unwrap();

        assert_ne!(created.product.category_id, tools.id);
        assert_eq!(created.category.name, "Garden");
    }

    #[tokio::test]
    async fn blank_new_category_name_falls_back_to_selected_id() {
        let (service, store) = service();
        let tools = store.seed_category("Tools").await;

        let created = service
            .create(CreateProduct {
                category_id: Some(tools.id),
                new_category_name: Some("   ".into()),
                ..create_input("Hammer")
            })
            .await
            .unwrap();

        assert_eq!(created.product.category_id, tools.id);
        assert_eq!(store.category_count().await, 1);
    }

    #[tokio::test]
    async fn create_without_any_category_is_rejected() {
        let (service, store) = service();
        store.seed_category("Tools").await;

        let err = service.create(create_input("Hammer")).await.unwrap_err();

        assert_matches!(err, AppError::InvalidForm(rejection) => {
            assert!(rejection.fields.contains_key("category_id"));
            assert_eq!(rejection.categories.len(), 1);
        });
        assert_eq!(store.count_products().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_with_unknown_category_id_is_rejected() {
        let (service, store) = service();

        let err = service
            .create(CreateProduct {
                category_id: Some(77),
                ..create_input("Hammer")
            })
            .await
            .unwrap_err();

        assert_matches!(err, AppError::InvalidForm(rejection) => {
            assert_eq!(
                rejection.fields["category_id"],
                vec!["category 77 does not exist".to_string()]
            );
        });
        assert_eq!(store.count_products().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn invalid_create_writes_nothing() {
        let (service, store) = service();
        store.seed_category("Tools").await;

        let err = service
            .create(CreateProduct {
                name: " ".into(),
                price_cents: -5,
                new_category_name: Some("Brand New".into()),
                ..create_input("")
            })
            .await
            .unwrap_err();

        assert_matches!(err, AppError::InvalidForm(rejection) => {
            assert!(rejection.fields.contains_key("name"));
            assert!(rejection.fields.contains_key("price_cents"));
            assert_eq!(rejection.categories.len(), 1);
        });
        assert_eq!(store.category_count().await, 1);
        assert_eq!(store.count_products().await.unwrap(), 0);
    }

    // -- update --------------------------------------------------------------

    #[tokio::test]
    async fn update_overwrites_all_fields_and_keeps_categories() {
        let (service, store) = service();
        let tools = store.seed_category("Tools").await;
        let garden = store.seed_category("Garden").await;
        let created = service
            .create(CreateProduct {
                category_id: Some(tools.id),
                description: Some("old".into()),
                ..create_input("Rake")
            })
            .await
            .unwrap();

        let updated = service
            .update(created.product.id, update_input("Leaf Rake", garden.id))
            .await
            .unwrap();

        assert_eq!(updated.name, "Leaf Rake");
        assert_eq!(updated.description.as_deref(), Some("updated"));
        assert_eq!(updated.price_cents, 4_200);
        assert_eq!(updated.category_id, garden.id);
        assert_eq!(store.category_count().await, 2);
    }

    #[tokio::test]
    async fn update_missing_product_is_not_found() {
        let (service, store) = service();
        let tools = store.seed_category("Tools").await;

        let err = service
            .update(999, update_input("Ghost", tools.id))
            .await
            .unwrap_err();

        assert_matches!(
            err,
            AppError::Core(CoreError::NotFound { entity: "Product", id: 999 })
        );
    }

    #[tokio::test]
    async fn invalid_update_leaves_product_unchanged() {
        let (service, store) = service();
        let tools = store.seed_category("Tools").await;
        let created = service
            .create(CreateProduct {
                category_id: Some(tools.id),
                ..create_input("Rake")
            })
            .await
            .unwrap();

        let err = service
            .update(created.product.id, update_input("", tools.id))
            .await
            .unwrap_err();
        assert_matches!(err, AppError::InvalidForm(_));

        let stored = service.get(created.product.id).await.unwrap();
        assert_eq!(stored.product.name, "Rake");
    }

    // -- delete --------------------------------------------------------------

    #[tokio::test]
    async fn delete_missing_product_is_not_found_and_changes_nothing() {
        let (service, store) = service();
        let cat = store.seed_category("Misc").await;
        seed_products(&service, cat.id, 2).await;

        let err = service.delete(12345).await.unwrap_err();

        assert_matches!(err, AppError::Core(CoreError::NotFound { .. }));
        assert_eq!(store.count_products().await.unwrap(), 2);
        assert_eq!(store.category_count().await, 1);
    }

    #[tokio::test]
    async fn delete_removes_product_but_not_category() {
        let (service, store) = service();
        let created = service
            .create(CreateProduct {
                new_category_name: Some("Widgets".into()),
                ..create_input("Sprocket")
            })
            .await
            .unwrap();

        service.delete(created.product.id).await.unwrap();

        assert_matches!(
            service.get(created.product.id).await,
            Err(AppError::Core(CoreError::NotFound { .. }))
        );
        assert_eq!(store.category_count().await, 1);
    }

    // -- forms ---------------------------------------------------------------

    #[tokio::test]
    async fn edit_form_for_missing_product_is_not_found() {
        let (service, _) = service();
        assert_matches!(
            service.edit_form(5).await,
            Err(AppError::Core(CoreError::NotFound { id: 5, .. }))
        );
    }

    #[tokio::test]
    async fn edit_form_includes_product_and_categories() {
        let (service, store) = service();
        let tools = store.seed_category("Tools").await;
        store.seed_category("Garden").await;
        let created = service
            .create(CreateProduct {
                category_id: Some(tools.id),
                ..create_input("Rake")
            })
            .await
            .unwrap();

        let form = service.edit_form(created.product.id).await.unwrap();
        assert_eq!(form.product.id, created.product.id);
        assert_eq!(form.categories.len(), 2);
    }

    #[tokio::test]
    async fn memory_store_is_always_healthy() {
        let (service, _) = service();
        assert!(service.is_healthy().await);
        assert_eq!(service.backend(), "memory");
    }
}
