use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::features::categories::models::Category;

/// Free-form product attributes (colour, compatibility, ...), stored as JSONB
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Database model for product
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sku: String,
    pub stock_level: i32,
    pub image_url: Option<String>,
    pub category_id: Option<i64>,
    pub attributes: Json<Attributes>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub category: Option<Category>,
}

/// Fields for a product about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sku: String,
    pub stock_level: i32,
    pub image_url: Option<String>,
    pub category_id: Option<i64>,
    pub attributes: Attributes,
    pub is_active: bool,
}

/// Full replacement of a product's mutable fields.
///
/// `sku` and `stock_level` keep their stored values when `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sku: Option<String>,
    pub stock_level: Option<i32>,
    pub image_url: Option<String>,
    pub category_id: Option<i64>,
    pub attributes: Attributes,
    pub is_active: bool,
}
