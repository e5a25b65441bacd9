use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::shared::types::PageRequest;

/// Sortable product columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ProductSortField {
    Id,
    Name,
    Price,
    Sku,
    StockLevel,
    CreatedAt,
    UpdatedAt,
}

impl ProductSortField {
    /// Accepts camelCase and snake_case names, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "sku" => Some(Self::Sku),
            "stocklevel" => Some(Self::StockLevel),
            "createdat" => Some(Self::CreatedAt),
            "updatedat" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Price => "price",
            Self::Sku => "sku",
            Self::StockLevel => "stock_level",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Anything other than "desc" (case-insensitive) sorts ascending
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Every optional filter, sort and page parameter of a product listing.
///
/// Absent fields add no predicate. Built fresh per request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Case-insensitive substring over name and description
    pub query: Option<String>,
    /// Only products with stock_level > 0
    pub in_stock: bool,
    /// `None` sorts by id ascending
    pub sort_by: Option<ProductSortField>,
    pub sort_dir: SortDirection,
    pub page: PageRequest,
}

impl ProductFilter {
    /// A filter that matches everything, on the given page
    pub fn unfiltered(page: PageRequest) -> Self {
        Self {
            category_id: None,
            min_price: None,
            max_price: None,
            query: None,
            in_stock: false,
            sort_by: None,
            sort_dir: SortDirection::Asc,
            page,
        }
    }
}
