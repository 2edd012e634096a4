//! Repository for the `products` table.

use catalog_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::product::{Product, ProductWithCategory, UpdateProduct};

/// Column list for products queries.
const COLUMNS: &str = "id, category_id, name, description, price_cents, created_at, updated_at";

/// Column list for products joined with categories (aliases `p` and `c`).
const JOINED_COLUMNS: &str = "p.id, p.category_id, p.name, p.description, p.price_cents, \
    p.created_at, p.updated_at, c.name AS category_name";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Count all products.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// One window of products joined with their category, ordered by id.
    pub async fn list_page(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM products p
             JOIN categories c ON c.id = p.category_id
             ORDER BY p.id ASC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, ProductWithCategory>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find a product by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by its ID, joined with its category.
    pub async fn find_with_category(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProductWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM products p
             JOIN categories c ON c.id = p.category_id
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, ProductWithCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a product inside an open transaction, returning the created row.
    pub async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        category_id: DbId,
        name: &str,
        description: Option<&str>,
        price_cents: i64,
    ) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (category_id, name, description, price_cents)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(category_id)
            .bind(name)
            .bind(description)
            .bind(price_cents)
            .fetch_one(&mut **tx)
            .await
    }

    /// Overwrite every mutable column of a product, returning the updated row.
    ///
    /// Returns `None` when no product has this ID.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                category_id = $2,
                name = $3,
                description = $4,
                price_cents = $5,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(input.category_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .fetch_optional(pool)
            .await
    }

    /// Delete a product by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
