//! In-memory repositories and request builders shared by service and handler tests.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use fake::faker::lorem::en::{Sentence, Word};
use fake::Fake;
use rust_decimal::Decimal;
use sqlx::types::Json;

use crate::core::config::PaginationConfig;
use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryRequestDto;
use crate::features::categories::models::{Category, CategoryInput};
use crate::features::categories::{CategoryRepository, CategoryService};
use crate::features::products::dtos::CreateProductDto;
use crate::features::products::models::{
    NewProduct, Product, ProductFilter, ProductSortField, ProductUpdate, SortDirection,
};
use crate::features::products::{ProductRepository, ProductService, SearchService};
use crate::shared::types::{PageRequest, Paginated};

#[derive(Default)]
struct CatalogState {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    deleted_categories: HashSet<i64>,
    deleted_products: HashSet<i64>,
    next_category_id: i64,
    next_product_id: i64,
}

impl CatalogState {
    fn live_category(&self, id: i64) -> Option<&Category> {
        self.categories
            .get(&id)
            .filter(|_| !self.deleted_categories.contains(&id))
    }

    fn live_categories(&self) -> impl Iterator<Item = &Category> {
        self.categories
            .values()
            .filter(|c| !self.deleted_categories.contains(&c.id))
    }

    fn live_products(&self) -> impl Iterator<Item = &Product> {
        self.products
            .values()
            .filter(|p| !self.deleted_products.contains(&p.id))
    }

    fn with_parent(&self, mut category: Category) -> Category {
        category.parent = category
            .parent_id
            .and_then(|pid| self.live_category(pid))
            .cloned()
            .map(Box::new);
        category
    }

    fn with_category(&self, mut product: Product) -> Product {
        product.category = product
            .category_id
            .and_then(|cid| self.live_category(cid))
            .cloned();
        product
    }

    fn ensure_category_name_free(&self, name: &str, except: Option<i64>) -> Result<()> {
        if self
            .live_categories()
            .any(|c| c.name == name && Some(c.id) != except)
        {
            return Err(AppError::Validation(
                "A category with this name already exists".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_sku_free(&self, sku: &str, except: Option<i64>) -> Result<()> {
        if self
            .live_products()
            .any(|p| p.sku == sku && Some(p.id) != except)
        {
            return Err(AppError::Validation(
                "A product with this SKU already exists".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_category_live(&self, category_id: Option<i64>) -> Result<()> {
        match category_id {
            Some(id) if self.live_category(id).is_none() => Err(AppError::Validation(format!(
                "Category with id {} does not exist",
                id
            ))),
            _ => Ok(()),
        }
    }

    /// Page through the live products accepted by `matches`, ordered like the SQL planner.
    fn page(
        &self,
        matches: impl Fn(&Product) -> bool,
        sort_by: Option<ProductSortField>,
        sort_dir: SortDirection,
        page: PageRequest,
    ) -> Paginated<Product> {
        let mut rows: Vec<&Product> = self.live_products().filter(|p| matches(p)).collect();
        rows.sort_by(|a, b| compare(a, b, sort_by, sort_dir));

        let total = rows.len() as i64;
        let items = rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|p| self.with_category(p.clone()))
            .collect();

        Paginated::new(items, page, total)
    }
}

fn compare(
    a: &Product,
    b: &Product,
    sort_by: Option<ProductSortField>,
    sort_dir: SortDirection,
) -> Ordering {
    let Some(field) = sort_by else {
        return a.id.cmp(&b.id);
    };

    let ordering = match field {
        ProductSortField::Id => a.id.cmp(&b.id),
        ProductSortField::Name => a.name.cmp(&b.name),
        ProductSortField::Price => a.price.cmp(&b.price),
        ProductSortField::Sku => a.sku.cmp(&b.sku),
        ProductSortField::StockLevel => a.stock_level.cmp(&b.stock_level),
        ProductSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        ProductSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    };
    let ordering = match sort_dir {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };

    ordering.then(a.id.cmp(&b.id))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_filter(product: &Product, filter: &ProductFilter) -> bool {
    filter.category_id.map_or(true, |id| product.category_id == Some(id))
        && filter.min_price.map_or(true, |min| product.price >= min)
        && filter.max_price.map_or(true, |max| product.price <= max)
        && (!filter.in_stock || product.stock_level > 0)
        && filter.query.as_deref().map_or(true, |q| {
            contains_ci(&product.name, q)
                || product
                    .description
                    .as_deref()
                    .is_some_and(|d| contains_ci(d, q))
        })
}

/// Shared in-memory store backing both fake repositories, so category and
/// product rules see each other's writes.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category_repository(&self) -> Arc<dyn CategoryRepository> {
        Arc::new(InMemoryCategoryRepository {
            state: Arc::clone(&self.state),
        })
    }

    pub fn product_repository(&self) -> Arc<dyn ProductRepository> {
        Arc::new(InMemoryProductRepository {
            state: Arc::clone(&self.state),
        })
    }

    pub fn category_service(&self) -> CategoryService {
        CategoryService::new(self.category_repository())
    }

    pub fn product_service(&self) -> ProductService {
        ProductService::new(self.product_repository(), PaginationConfig::default())
    }

    pub fn search_service(&self) -> SearchService {
        SearchService::new(self.product_repository(), PaginationConfig::default())
    }
}

struct InMemoryCategoryRepository {
    state: Arc<Mutex<CatalogState>>,
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, input: CategoryInput) -> Result<Category> {
        let mut state = self.state.lock().unwrap();
        state.ensure_category_name_free(&input.name, None)?;
        if let Some(pid) = input.parent_id {
            if !state.categories.contains_key(&pid) {
                return Err(AppError::Validation(
                    "Parent category does not exist".to_string(),
                ));
            }
        }

        state.next_category_id += 1;
        let now = Utc::now();
        let category = Category {
            id: state.next_category_id,
            name: input.name,
            description: input.description,
            parent_id: input.parent_id,
            image_url: input.image_url,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
            parent: None,
        };
        state.categories.insert(category.id, category.clone());

        Ok(state.with_parent(category))
    }

    async fn get_by_id(&self, id: i64) -> Result<Category> {
        let state = self.state.lock().unwrap();
        let category = state
            .live_category(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))?;
        Ok(state.with_parent(category))
    }

    async fn update(&self, id: i64, input: CategoryInput) -> Result<Category> {
        let mut state = self.state.lock().unwrap();
        if state.live_category(id).is_none() {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }
        state.ensure_category_name_free(&input.name, Some(id))?;

        let category = state
            .categories
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))?;
        category.name = input.name;
        category.description = input.description;
        category.parent_id = input.parent_id;
        category.image_url = input.image_url;
        category.is_active = input.is_active;
        category.updated_at = Utc::now();
        let category = category.clone();

        Ok(state.with_parent(category))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.live_category(id).is_none() {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }
        if state.live_products().any(|p| p.category_id == Some(id)) {
            return Err(AppError::Conflict(
                "cannot delete category with associated products".to_string(),
            ));
        }

        state.deleted_categories.insert(id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let state = self.state.lock().unwrap();
        let mut categories: Vec<Category> = state
            .live_categories()
            .map(|c| state.with_parent(c.clone()))
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }
}

struct InMemoryProductRepository {
    state: Arc<Mutex<CatalogState>>,
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product> {
        let mut state = self.state.lock().unwrap();
        state.ensure_category_live(product.category_id)?;
        state.ensure_sku_free(&product.sku, None)?;

        state.next_product_id += 1;
        let now = Utc::now();
        let created = Product {
            id: state.next_product_id,
            name: product.name,
            description: product.description,
            price: product.price,
            sku: product.sku,
            stock_level: product.stock_level,
            image_url: product.image_url,
            category_id: product.category_id,
            attributes: Json(product.attributes),
            is_active: product.is_active,
            created_at: now,
            updated_at: now,
            category: None,
        };
        state.products.insert(created.id, created.clone());

        Ok(state.with_category(created))
    }

    async fn get_by_id(&self, id: i64) -> Result<Product> {
        let state = self.state.lock().unwrap();
        let product = state
            .live_products()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;
        Ok(state.with_category(product))
    }

    async fn update(&self, id: i64, update: ProductUpdate) -> Result<Product> {
        let mut state = self.state.lock().unwrap();
        state.ensure_category_live(update.category_id)?;
        if !state.live_products().any(|p| p.id == id) {
            return Err(AppError::NotFound(format!(
                "Product with id {} not found",
                id
            )));
        }
        if let Some(sku) = update.sku.as_deref() {
            state.ensure_sku_free(sku, Some(id))?;
        }

        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;
        product.name = update.name;
        product.description = update.description;
        product.price = update.price;
        if let Some(sku) = update.sku {
            product.sku = sku;
        }
        if let Some(stock_level) = update.stock_level {
            product.stock_level = stock_level;
        }
        product.image_url = update.image_url;
        product.category_id = update.category_id;
        product.attributes = Json(update.attributes);
        product.is_active = update.is_active;
        product.updated_at = Utc::now();
        let product = product.clone();

        Ok(state.with_category(product))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.live_products().any(|p| p.id == id) {
            return Err(AppError::NotFound(format!(
                "Product with id {} not found",
                id
            )));
        }
        state.deleted_products.insert(id);
        Ok(())
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Paginated<Product>> {
        let state = self.state.lock().unwrap();
        Ok(state.page(
            |p| matches_filter(p, filter),
            filter.sort_by,
            filter.sort_dir,
            filter.page,
        ))
    }

    async fn search(&self, query: &str, page: PageRequest) -> Result<Paginated<Product>> {
        let state = self.state.lock().unwrap();
        Ok(state.page(
            |p| {
                contains_ci(&p.name, query)
                    || contains_ci(&p.sku, query)
                    || p.description.as_deref().is_some_and(|d| contains_ci(d, query))
            },
            None,
            SortDirection::Asc,
            page,
        ))
    }

    async fn update_stock(&self, id: i64, delta: i32) -> Result<Product> {
        let mut state = self.state.lock().unwrap();
        if !state.live_products().any(|p| p.id == id) {
            return Err(AppError::NotFound(format!(
                "Product with id {} not found",
                id
            )));
        }

        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;
        product.stock_level = product
            .stock_level
            .checked_add(delta)
            .ok_or_else(|| AppError::Validation("Stock level is out of range".to_string()))?;
        product.updated_at = Utc::now();
        let product = product.clone();

        Ok(state.with_category(product))
    }
}

// =============================================================================
// REQUEST BUILDERS
// =============================================================================

pub fn category_request(name: &str, parent_id: Option<i64>) -> CategoryRequestDto {
    CategoryRequestDto {
        name: name.to_string(),
        description: None,
        parent_id,
        image_url: None,
        is_active: true,
    }
}

/// Create request with a decimal price such as `"49.99"`
pub fn product_request(
    name: &str,
    sku: &str,
    price: &str,
    category_id: Option<i64>,
) -> CreateProductDto {
    CreateProductDto {
        name: name.to_string(),
        description: None,
        price: price.parse().unwrap(),
        sku: sku.to_string(),
        stock_level: 0,
        image_url: None,
        category_id,
        attributes: None,
        is_active: true,
    }
}

/// Create request with generated name, description, price, stock and attributes
pub fn random_product_request(sku: &str, category_id: Option<i64>) -> CreateProductDto {
    let name: String = Sentence(1..4).fake();
    let description: String = Sentence(4..12).fake();
    let cents: i64 = (100..100_000).fake();
    let colour: String = Word().fake();

    let mut attributes = serde_json::Map::new();
    attributes.insert("colour".to_string(), serde_json::Value::String(colour));

    CreateProductDto {
        name,
        description: Some(description),
        price: Decimal::new(cents, 2),
        sku: sku.to_string(),
        stock_level: (0..50).fake(),
        image_url: None,
        category_id,
        attributes: Some(attributes),
        is_active: true,
    }
}

/// Insert-ready product priced in cents, for repository tests
pub fn new_product(name: &str, sku: &str, price_cents: i64, category_id: Option<i64>) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: None,
        price: Decimal::new(price_cents, 2),
        sku: sku.to_string(),
        stock_level: 0,
        image_url: None,
        category_id,
        attributes: serde_json::Map::new(),
        is_active: true,
    }
}
