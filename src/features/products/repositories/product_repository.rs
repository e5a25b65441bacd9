//! Storage adapter for the `products` table, including the listing and
//! search query planner.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::core::error::{
    AppError, Result, PG_CHECK_VIOLATION, PG_FOREIGN_KEY_VIOLATION, PG_NUMERIC_OUT_OF_RANGE,
    PG_UNIQUE_VIOLATION,
};
use crate::features::categories::models::Category;
use crate::features::categories::repositories::category_repository::{
    find_by_id as find_category, find_many as find_categories, lock_for_reference,
};
use crate::features::products::models::{
    NewProduct, Product, ProductFilter, ProductSortField, ProductUpdate, SortDirection,
};
use crate::shared::types::{PageRequest, Paginated};
use crate::shared::validation::contains_pattern;

/// Column list shared across product queries.
const COLUMNS: &str = "id, name, description, price, sku, stock_level, image_url, category_id, \
    attributes, is_active, created_at, updated_at";

/// Persistence operations for products.
///
/// Every read ignores soft-deleted rows, and every returned product has its
/// category resolved.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: NewProduct) -> Result<Product>;

    async fn get_by_id(&self, id: i64) -> Result<Product>;

    async fn update(&self, id: i64, product: ProductUpdate) -> Result<Product>;

    async fn delete(&self, id: i64) -> Result<()>;

    /// Filtered, sorted page of products plus the total count of the filtered set.
    async fn list(&self, filter: &ProductFilter) -> Result<Paginated<Product>>;

    /// Case-insensitive substring search over name, description and SKU.
    async fn search(&self, query: &str, page: PageRequest) -> Result<Paginated<Product>>;

    /// Add `delta` (possibly negative) to the stock level in one atomic statement.
    async fn update_stock(&self, id: i64, delta: i32) -> Result<Product>;
}

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn resolve_category(&self, mut product: Product) -> Result<Product> {
        if let Some(category_id) = product.category_id {
            product.category = find_category(&self.pool, category_id)
                .await
                .map_err(handle_db_error)?;
        }
        Ok(product)
    }

    /// Run a count query and a page query against one snapshot so the total
    /// always agrees with the rows returned.
    async fn fetch_page(
        &self,
        mut count_query: QueryBuilder<'static, Postgres>,
        mut page_query: QueryBuilder<'static, Postgres>,
        page: PageRequest,
    ) -> Result<Paginated<Product>> {
        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        let products: Vec<Product> = page_query
            .build_query_as()
            .fetch_all(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        let products = attach_categories(&mut tx, products).await?;
        tx.commit().await.map_err(handle_db_error)?;

        Ok(Paginated::new(products, page, total))
    }
}

/// Convert database error to a product-specific AppError
fn handle_db_error(e: sqlx::Error) -> AppError {
    match AppError::db_code(&e).as_deref() {
        Some(PG_UNIQUE_VIOLATION) => {
            AppError::Validation("A product with this SKU already exists".to_string())
        }
        Some(PG_FOREIGN_KEY_VIOLATION) => {
            AppError::Validation("Referenced category does not exist".to_string())
        }
        Some(PG_CHECK_VIOLATION) => {
            AppError::Validation("Price must be greater than zero".to_string())
        }
        Some(PG_NUMERIC_OUT_OF_RANGE) => {
            AppError::Validation("Price is out of range".to_string())
        }
        _ => {
            tracing::error!("Product query failed: {:?}", e);
            AppError::Database(e)
        }
    }
}

/// Stock adjustments only touch `stock_level`, so an overflow is about stock.
fn handle_stock_error(e: sqlx::Error) -> AppError {
    match AppError::db_code(&e).as_deref() {
        Some(PG_NUMERIC_OUT_OF_RANGE) => {
            AppError::Validation("Stock level is out of range".to_string())
        }
        _ => handle_db_error(e),
    }
}

/// Share-lock the referenced category for the rest of the transaction.
async fn lock_category(conn: &mut PgConnection, id: i64) -> Result<Category> {
    lock_for_reference(conn, id)
        .await
        .map_err(handle_db_error)?
        .ok_or_else(|| AppError::Validation(format!("Category with id {} does not exist", id)))
}

async fn attach_categories(conn: &mut PgConnection, products: Vec<Product>) -> Result<Vec<Product>> {
    let mut ids: Vec<i64> = products.iter().filter_map(|p| p.category_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let categories = find_categories(conn, &ids).await.map_err(handle_db_error)?;

    Ok(products
        .into_iter()
        .map(|mut p| {
            p.category = p.category_id.and_then(|id| categories.get(&id)).cloned();
            p
        })
        .collect())
}

// =============================================================================
// QUERY PLANNER
// =============================================================================

fn push_list_conditions(builder: &mut QueryBuilder<'static, Postgres>, filter: &ProductFilter) {
    builder.push(" WHERE deleted_at IS NULL");

    if let Some(category_id) = filter.category_id {
        builder.push(" AND category_id = ").push_bind(category_id);
    }
    if let Some(min_price) = filter.min_price {
        builder.push(" AND price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        builder.push(" AND price <= ").push_bind(max_price);
    }
    if filter.in_stock {
        builder.push(" AND stock_level > 0");
    }
    if let Some(query) = filter.query.as_deref() {
        let pattern = contains_pattern(query);
        builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn push_search_conditions(builder: &mut QueryBuilder<'static, Postgres>, query: &str) {
    let pattern = contains_pattern(query);
    builder
        .push(" WHERE deleted_at IS NULL AND (name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR description ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR sku ILIKE ")
        .push_bind(pattern)
        .push(")");
}

/// Explicit sort first, then id as the tie-breaker so pages never overlap.
fn push_order_by(
    builder: &mut QueryBuilder<'static, Postgres>,
    sort_by: Option<ProductSortField>,
    sort_dir: SortDirection,
) {
    match sort_by {
        None => {
            builder.push(" ORDER BY id ASC");
        }
        Some(ProductSortField::Id) => {
            builder.push(format!(" ORDER BY id {}", sort_dir.as_sql()));
        }
        Some(field) => {
            builder.push(format!(
                " ORDER BY {} {}, id ASC",
                field.as_sql(),
                sort_dir.as_sql()
            ));
        }
    }
}

fn push_pagination(builder: &mut QueryBuilder<'static, Postgres>, page: PageRequest) {
    builder
        .push(" LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
}

pub(crate) fn list_count_query(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM products");
    push_list_conditions(&mut builder, filter);
    builder
}

pub(crate) fn list_page_query(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {COLUMNS} FROM products"));
    push_list_conditions(&mut builder, filter);
    push_order_by(&mut builder, filter.sort_by, filter.sort_dir);
    push_pagination(&mut builder, filter.page);
    builder
}

pub(crate) fn search_count_query(query: &str) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM products");
    push_search_conditions(&mut builder, query);
    builder
}

pub(crate) fn search_page_query(query: &str, page: PageRequest) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {COLUMNS} FROM products"));
    push_search_conditions(&mut builder, query);
    push_order_by(&mut builder, None, SortDirection::Asc);
    push_pagination(&mut builder, page);
    builder
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product> {
        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;

        let category = match product.category_id {
            Some(category_id) => Some(lock_category(&mut tx, category_id).await?),
            None => None,
        };

        let query = format!(
            "INSERT INTO products
                (name, description, price, sku, stock_level, image_url, category_id,
                 attributes, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let mut created = sqlx::query_as::<_, Product>(&query)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.sku)
            .bind(product.stock_level)
            .bind(&product.image_url)
            .bind(product.category_id)
            .bind(Json(&product.attributes))
            .bind(product.is_active)
            .fetch_one(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        tx.commit().await.map_err(handle_db_error)?;

        tracing::info!("Created product {} (sku={})", created.id, created.sku);
        created.category = category;
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Product> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1 AND deleted_at IS NULL");
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

        self.resolve_category(product).await
    }

    async fn update(&self, id: i64, product: ProductUpdate) -> Result<Product> {
        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;

        let category = match product.category_id {
            Some(category_id) => Some(lock_category(&mut tx, category_id).await?),
            None => None,
        };

        let query = format!(
            "UPDATE products
             SET name = $1,
                 description = $2,
                 price = $3,
                 sku = COALESCE($4, sku),
                 stock_level = COALESCE($5, stock_level),
                 image_url = $6,
                 category_id = $7,
                 attributes = $8,
                 is_active = $9,
                 updated_at = NOW()
             WHERE id = $10 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let mut updated = sqlx::query_as::<_, Product>(&query)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.sku)
            .bind(product.stock_level)
            .bind(&product.image_url)
            .bind(product.category_id)
            .bind(Json(&product.attributes))
            .bind(product.is_active)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

        tx.commit().await.map_err(handle_db_error)?;

        updated.category = category;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(handle_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Product with id {} not found",
                id
            )));
        }

        tracing::info!("Soft-deleted product {}", id);
        Ok(())
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Paginated<Product>> {
        self.fetch_page(list_count_query(filter), list_page_query(filter), filter.page)
            .await
    }

    async fn search(&self, query: &str, page: PageRequest) -> Result<Paginated<Product>> {
        self.fetch_page(search_count_query(query), search_page_query(query, page), page)
            .await
    }

    async fn update_stock(&self, id: i64, delta: i32) -> Result<Product> {
        let query = format!(
            "UPDATE products
             SET stock_level = stock_level + $1, updated_at = NOW()
             WHERE id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(delta)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_stock_error)?
            .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

        tracing::debug!(
            "Adjusted stock of product {} by {} to {}",
            id,
            delta,
            product.stock_level
        );
        self.resolve_category(product).await
    }
}
