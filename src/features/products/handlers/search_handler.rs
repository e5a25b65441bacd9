use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::products::dtos::{ProductResponseDto, SearchQuery};
use crate::features::products::services::SearchService;
use crate::shared::types::{ApiResponse, Paginated};

/// Search products by name, description or SKU
#[utoipa::path(
    get,
    path = "/api/v1/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<Paginated<ProductResponseDto>>),
        (status = 400, description = "Missing search query")
    ),
    tag = "search"
)]
pub async fn search_products(
    State(service): State<Arc<SearchService>>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<ApiResponse<Paginated<ProductResponseDto>>>> {
    let page = service.search(query).await?;
    Ok(Json(ApiResponse::success(Some(page), None, None)))
}
