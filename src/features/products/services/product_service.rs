use std::sync::Arc;

use validator::Validate;

use crate::core::config::PaginationConfig;
use crate::core::error::{AppError, Result};
use crate::features::products::dtos::{CreateProductDto, ProductResponseDto, UpdateProductDto};
use crate::features::products::models::ProductFilter;
use crate::features::products::repositories::ProductRepository;
use crate::shared::types::Paginated;

/// Service for product operations
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
    pagination: PaginationConfig,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>, pagination: PaginationConfig) -> Self {
        Self { repo, pagination }
    }

    /// Page size policy applied to list requests
    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// Create a new product
    pub async fn create(&self, dto: CreateProductDto) -> Result<ProductResponseDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let product = self.repo.create(dto.into()).await?;
        Ok(product.into())
    }

    /// Get product by ID, with its category resolved
    pub async fn get_by_id(&self, id: i64) -> Result<ProductResponseDto> {
        Ok(self.repo.get_by_id(id).await?.into())
    }

    /// Replace the mutable fields of a product
    pub async fn update(&self, id: i64, dto: UpdateProductDto) -> Result<ProductResponseDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let product = self.repo.update(id, dto.into()).await?;
        Ok(product.into())
    }

    /// Soft-delete a product
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await
    }

    /// Filtered, sorted, paginated product listing
    pub async fn list(&self, filter: ProductFilter) -> Result<Paginated<ProductResponseDto>> {
        let page = self.repo.list(&filter).await?;
        Ok(page.map(ProductResponseDto::from))
    }

    /// Add a signed quantity to the stock level. Stock may go negative.
    pub async fn update_stock(&self, id: i64, quantity: i32) -> Result<ProductResponseDto> {
        Ok(self.repo.update_stock(id, quantity).await?.into())
    }
}
