//! Storage adapter for the `categories` table.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};

use crate::core::error::{AppError, Result, PG_FOREIGN_KEY_VIOLATION, PG_UNIQUE_VIOLATION};
use crate::features::categories::models::{Category, CategoryInput};

/// Column list shared across category queries.
pub(crate) const COLUMNS: &str =
    "id, name, description, parent_id, image_url, is_active, created_at, updated_at";

/// Persistence operations for categories.
///
/// Every read ignores soft-deleted rows.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, input: CategoryInput) -> Result<Category>;

    /// Fetch a category with its direct parent resolved.
    async fn get_by_id(&self, id: i64) -> Result<Category>;

    async fn update(&self, id: i64, input: CategoryInput) -> Result<Category>;

    /// Soft-delete a category. Fails with `Conflict` while any product references it.
    async fn delete(&self, id: i64) -> Result<()>;

    async fn list(&self) -> Result<Vec<Category>>;
}

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn resolve_parent(&self, mut category: Category) -> Result<Category> {
        if let Some(parent_id) = category.parent_id {
            category.parent = find_by_id(&self.pool, parent_id)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to load parent category {}: {:?}", parent_id, e);
                    AppError::Database(e)
                })?
                .map(Box::new);
        }
        Ok(category)
    }
}

/// Convert database error to a category-specific AppError
fn handle_db_error(e: sqlx::Error) -> AppError {
    match AppError::db_code(&e).as_deref() {
        Some(PG_UNIQUE_VIOLATION) => {
            AppError::Validation("A category with this name already exists".to_string())
        }
        Some(PG_FOREIGN_KEY_VIOLATION) => {
            AppError::Validation("Parent category does not exist".to_string())
        }
        _ => {
            tracing::error!("Category query failed: {:?}", e);
            AppError::Database(e)
        }
    }
}

/// Load a single non-deleted category without resolving its parent.
pub(crate) async fn find_by_id<'e, E>(executor: E, id: i64) -> std::result::Result<Option<Category>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 AND deleted_at IS NULL");
    sqlx::query_as::<_, Category>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Load the non-deleted categories among `ids`, keyed by id.
pub(crate) async fn find_many<'e, E>(
    executor: E,
    ids: &[i64],
) -> std::result::Result<HashMap<i64, Category>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let query =
        format!("SELECT {COLUMNS} FROM categories WHERE id = ANY($1) AND deleted_at IS NULL");
    let categories = sqlx::query_as::<_, Category>(&query)
        .bind(ids)
        .fetch_all(executor)
        .await?;

    Ok(categories.into_iter().map(|c| (c.id, c)).collect())
}

/// Take a share lock on a live category row so it cannot be soft-deleted
/// until the surrounding transaction ends.
pub(crate) async fn lock_for_reference<'e, E>(
    executor: E,
    id: i64,
) -> std::result::Result<Option<Category>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let query = format!(
        "SELECT {COLUMNS} FROM categories WHERE id = $1 AND deleted_at IS NULL FOR SHARE"
    );
    sqlx::query_as::<_, Category>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, input: CategoryInput) -> Result<Category> {
        let query = format!(
            "INSERT INTO categories (name, description, parent_id, image_url, is_active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.parent_id)
            .bind(&input.image_url)
            .bind(input.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)?;

        tracing::info!("Created category {} ({})", category.id, category.name);
        self.resolve_parent(category).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Category> {
        let category = find_by_id(&self.pool, id)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))?;

        self.resolve_parent(category).await
    }

    async fn update(&self, id: i64, input: CategoryInput) -> Result<Category> {
        let query = format!(
            "UPDATE categories
             SET name = $1,
                 description = $2,
                 parent_id = $3,
                 image_url = $4,
                 is_active = $5,
                 updated_at = NOW()
             WHERE id = $6 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.parent_id)
            .bind(&input.image_url)
            .bind(input.is_active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))?;

        self.resolve_parent(category).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;

        // FOR UPDATE conflicts with the FOR SHARE lock product writes take on
        // their category, so the count below cannot go stale before commit.
        let locked: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM categories WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(handle_db_error)?;

        if locked.is_none() {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }

        let product_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE category_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(handle_db_error)?;

        if product_count > 0 {
            tracing::info!(
                "Refusing to delete category {}: {} products still reference it",
                id,
                product_count
            );
            return Err(AppError::Conflict(
                "cannot delete category with associated products".to_string(),
            ));
        }

        sqlx::query("UPDATE categories SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        tx.commit().await.map_err(handle_db_error)?;

        tracing::info!("Soft-deleted category {}", id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories WHERE deleted_at IS NULL ORDER BY name, id"
        );
        let categories = sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)?;

        let by_id: HashMap<i64, Category> =
            categories.iter().map(|c| (c.id, c.clone())).collect();

        Ok(categories
            .into_iter()
            .map(|mut c| {
                c.parent = c
                    .parent_id
                    .and_then(|pid| by_id.get(&pid))
                    .cloned()
                    .map(Box::new);
                c
            })
            .collect())
    }
}
