use std::sync::Arc;

use crate::core::config::PaginationConfig;
use crate::core::error::{AppError, Result};
use crate::features::products::dtos::{ProductResponseDto, SearchQuery};
use crate::features::products::repositories::ProductRepository;
use crate::shared::types::{PageRequest, Paginated};

/// Free-text search across products
pub struct SearchService {
    repo: Arc<dyn ProductRepository>,
    pagination: PaginationConfig,
}

impl SearchService {
    pub fn new(repo: Arc<dyn ProductRepository>, pagination: PaginationConfig) -> Self {
        Self { repo, pagination }
    }

    /// Case-insensitive substring match over name, description and SKU
    pub async fn search(&self, query: SearchQuery) -> Result<Paginated<ProductResponseDto>> {
        let term = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::BadRequest("Search query is required".to_string()))?;

        let page = PageRequest::normalized(query.page, query.page_size, &self.pagination);
        tracing::debug!("Searching products for {:?} (page {})", term, page.page);

        let result = self.repo.search(term, page).await?;
        Ok(result.map(ProductResponseDto::from))
    }
}
