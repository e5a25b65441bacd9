use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::config::PaginationConfig;
use crate::features::categories::dtos::CategorySummaryDto;
use crate::features::products::models::{
    Attributes, NewProduct, Product, ProductFilter, ProductSortField, ProductUpdate, SortDirection,
};
use crate::shared::types::PageRequest;
use crate::shared::validation::{validate_not_blank, validate_price};

fn default_true() -> bool {
    true
}

/// Trim a free-text value, treating blank input as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Request body for creating a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductDto {
    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank", message = "product name is required"),
        length(max = 255)
    )]
    pub name: String,

    pub description: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = f64, example = 49.99)]
    pub price: Decimal,

    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank", message = "sku is required"),
        length(max = 50)
    )]
    pub sku: String,

    #[serde(default)]
    pub stock_level: i32,

    #[validate(length(max = 255))]
    pub image_url: Option<String>,

    pub category_id: Option<i64>,

    #[schema(value_type = Option<Object>)]
    pub attributes: Option<Attributes>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<CreateProductDto> for NewProduct {
    fn from(dto: CreateProductDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            description: dto.description,
            price: dto.price,
            sku: dto.sku.trim().to_string(),
            stock_level: dto.stock_level,
            image_url: dto.image_url,
            category_id: dto.category_id,
            attributes: dto.attributes.unwrap_or_default(),
            is_active: dto.is_active,
        }
    }
}

/// Request body for replacing a product.
///
/// A missing or blank `sku` and a missing `stockLevel` keep the stored values.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductDto {
    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank", message = "product name is required"),
        length(max = 255)
    )]
    pub name: String,

    pub description: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = f64, example = 49.99)]
    pub price: Decimal,

    #[validate(length(max = 50))]
    pub sku: Option<String>,

    pub stock_level: Option<i32>,

    #[validate(length(max = 255))]
    pub image_url: Option<String>,

    pub category_id: Option<i64>,

    #[schema(value_type = Option<Object>)]
    pub attributes: Option<Attributes>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<UpdateProductDto> for ProductUpdate {
    fn from(dto: UpdateProductDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            description: dto.description,
            price: dto.price,
            sku: non_blank(dto.sku),
            stock_level: dto.stock_level,
            image_url: dto.image_url,
            category_id: dto.category_id,
            attributes: dto.attributes.unwrap_or_default(),
            is_active: dto.is_active,
        }
    }
}

/// Relative stock adjustment
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StockUpdateDto {
    /// Signed delta added to the current stock level
    pub quantity: i32,
}

/// Query params for listing products
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    pub category_id: Option<i64>,
    #[param(value_type = Option<f64>)]
    pub min_price: Option<Decimal>,
    #[param(value_type = Option<f64>)]
    pub max_price: Option<Decimal>,
    /// Case-insensitive substring over name and description
    pub q: Option<String>,
    /// Only products with stock on hand
    #[serde(default)]
    pub in_stock: bool,
    /// id, name, price, sku, stockLevel, createdAt or updatedAt
    pub sort_by: Option<String>,
    /// asc (default) or desc
    pub sort_dir: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ListProductsQuery {
    pub fn into_filter(self, pagination: &PaginationConfig) -> ProductFilter {
        ProductFilter {
            category_id: self.category_id,
            min_price: self.min_price,
            max_price: self.max_price,
            query: non_blank(self.q),
            in_stock: self.in_stock,
            sort_by: self.sort_by.as_deref().and_then(ProductSortField::parse),
            sort_dir: SortDirection::parse(self.sort_dir.as_deref()),
            page: PageRequest::normalized(self.page, self.page_size, pagination),
        }
    }
}

/// Response DTO for product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponseDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = f64, example = 49.99)]
    pub price: Decimal,
    pub sku: String,
    pub stock_level: i32,
    pub image_url: Option<String>,
    pub category_id: Option<i64>,
    pub category: Option<CategorySummaryDto>,
    #[schema(value_type = Object)]
    pub attributes: Attributes,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponseDto {
    fn from(p: Product) -> Self {
        Self {
            category: p.category.as_ref().map(CategorySummaryDto::from),
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            sku: p.sku,
            stock_level: p.stock_level,
            image_url: p.image_url,
            category_id: p.category_id,
            attributes: p.attributes.0,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_create_dto_defaults() {
        let dto: CreateProductDto = serde_json::from_value(json!({
            "name": "Earbuds",
            "price": 49.99,
            "sku": "AUD-001"
        }))
        .unwrap();

        assert!(dto.validate().is_ok());
        assert_eq!(dto.price, dec!(49.99));

        let product = NewProduct::from(dto);
        assert_eq!(product.stock_level, 0);
        assert!(product.is_active);
        assert!(product.attributes.is_empty());
    }

    #[test]
    fn test_create_dto_rejects_missing_fields() {
        let dto: CreateProductDto = serde_json::from_value(json!({})).unwrap();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("sku"));
    }

    #[test]
    fn test_create_dto_rejects_unstorable_price() {
        for price in [json!(0), json!(-1.5), json!(0.004), json!(49.999), json!(1e11)] {
            let dto: CreateProductDto = serde_json::from_value(json!({
                "name": "Earbuds",
                "price": price,
                "sku": "AUD-001"
            }))
            .unwrap();
            assert!(dto.validate().is_err());
        }
    }

    #[test]
    fn test_update_dto_blank_sku_keeps_stored_value() {
        let dto: UpdateProductDto = serde_json::from_value(json!({
            "name": "Earbuds Pro",
            "price": 59.99,
            "sku": "  "
        }))
        .unwrap();
        assert!(dto.validate().is_ok());

        let update = ProductUpdate::from(dto);
        assert_eq!(update.sku, None);
        assert_eq!(update.stock_level, None);
    }

    #[test]
    fn test_list_query_into_filter() {
        let query = ListProductsQuery {
            category_id: Some(4),
            q: Some("  ".to_string()),
            in_stock: true,
            sort_by: Some("stockLevel".to_string()),
            sort_dir: Some("DESC".to_string()),
            page: Some(0),
            page_size: Some(500),
            ..Default::default()
        };

        let filter = query.into_filter(&PaginationConfig::default());
        assert_eq!(filter.category_id, Some(4));
        assert_eq!(filter.query, None);
        assert!(filter.in_stock);
        assert_eq!(filter.sort_by, Some(ProductSortField::StockLevel));
        assert_eq!(filter.sort_dir, SortDirection::Desc);
        assert_eq!(
            filter.page,
            PageRequest {
                page: 1,
                page_size: 100
            }
        );
    }

    #[test]
    fn test_unknown_sort_field_falls_back_to_default() {
        let query = ListProductsQuery {
            sort_by: Some("popularity".to_string()),
            ..Default::default()
        };
        let filter = query.into_filter(&PaginationConfig::default());
        assert_eq!(filter.sort_by, None);
        assert_eq!(filter.sort_dir, SortDirection::Asc);
    }
}
