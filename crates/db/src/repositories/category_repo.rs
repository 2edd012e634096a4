//! Repository for the `categories` table.

use catalog_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::category::Category;

/// Column list for categories queries.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides lookups and find-or-create for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List all categories, ordered by name ignoring case.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY LOWER(name) ASC, id ASC");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Find a category by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Return the category named `name` (ignoring case), creating it if absent.
    ///
    /// The boolean is `true` when this call inserted the row. A concurrent
    /// insert of the same name loses on `uq_categories_name_lower` and falls
    /// back to reading the winner's row.
    pub async fn find_or_create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<(Category, bool), sqlx::Error> {
        let select = format!("SELECT {COLUMNS} FROM categories WHERE LOWER(name) = LOWER($1)");

        if let Some(existing) = sqlx::query_as::<_, Category>(&select)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?
        {
            return Ok((existing, false));
        }

        let insert = format!(
            "INSERT INTO categories (name) VALUES ($1)
             ON CONFLICT DO NOTHING
             RETURNING {COLUMNS}"
        );
        if let Some(created) = sqlx::query_as::<_, Category>(&insert)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?
        {
            return Ok((created, true));
        }

        let winner = sqlx::query_as::<_, Category>(&select)
            .bind(name)
            .fetch_one(&mut **tx)
            .await?;
        Ok((winner, false))
    }

    /// Find a category by ID inside an open transaction, locking it against
    /// concurrent modification until commit.
    pub async fn find_by_id_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 FOR SHARE");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }
}
