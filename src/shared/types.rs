use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::config::PaginationConfig;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// A page number and size that have already been normalized against the
/// configured pagination policy. Both values are always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Missing or non-positive values fall back to page 1 and the default size;
    /// oversized pages are capped at the configured maximum.
    pub fn normalized(page: Option<i64>, page_size: Option<i64>, config: &PaginationConfig) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let page_size = page_size
            .filter(|s| *s >= 1)
            .unwrap_or(config.default_page_size)
            .min(config.max_page_size);

        Self { page, page_size }
    }

    /// Calculate SQL OFFSET from page number
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// One page of results plus the totals of the full filtered set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: i64) -> Self {
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_items,
            total_pages: total_pages(total_items, request.page_size),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// ceil(total_items / page_size), zero for an empty result
pub fn total_pages(total_items: i64, page_size: i64) -> i64 {
    if total_items <= 0 || page_size <= 0 {
        return 0;
    }
    (total_items + page_size - 1) / page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(3, 2), 2);
    }

    #[test]
    fn test_total_pages_matches_ceil_division() {
        for total in 0..200i64 {
            for size in 1..30i64 {
                let expected = (total as f64 / size as f64).ceil() as i64;
                assert_eq!(total_pages(total, size), expected, "{total}/{size}");
            }
        }
    }

    #[test]
    fn test_zero_page_and_size_normalize_to_defaults() {
        let config = PaginationConfig::default();
        let request = PageRequest::normalized(Some(0), Some(0), &config);
        assert_eq!(
            request,
            PageRequest {
                page: 1,
                page_size: 20
            }
        );

        let request = PageRequest::normalized(Some(-3), None, &config);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 20);
    }

    #[test]
    fn test_page_size_is_capped() {
        let config = PaginationConfig::new(10, 50).unwrap();
        let request = PageRequest::normalized(Some(2), Some(500), &config);
        assert_eq!(request.page_size, 50);
        assert_eq!(request.offset(), 50);
    }

    #[test]
    fn test_offset() {
        let request = PageRequest {
            page: 3,
            page_size: 20,
        };
        assert_eq!(request.offset(), 40);
        assert_eq!(request.limit(), 20);

        let huge = PageRequest {
            page: i64::MAX,
            page_size: 100,
        };
        assert_eq!(huge.offset(), i64::MAX);
    }

    #[test]
    fn test_paginated_envelope_serializes_camel_case() {
        let page = Paginated::new(
            vec![1, 2],
            PageRequest {
                page: 1,
                page_size: 2,
            },
            5,
        );
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["items"], serde_json::json!([1, 2]));
        assert_eq!(value["pageSize"], 2);
        assert_eq!(value["totalItems"], 5);
        assert_eq!(value["totalPages"], 3);
    }

    #[test]
    fn test_map_keeps_totals() {
        let page = Paginated::new(
            vec![1, 2],
            PageRequest {
                page: 1,
                page_size: 2,
            },
            3,
        )
        .map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total_pages, 2);
    }
}
