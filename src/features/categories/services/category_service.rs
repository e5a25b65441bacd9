use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{CategoryRequestDto, CategoryResponseDto, CategoryTreeDto};
use crate::features::categories::models::Category;
use crate::features::categories::repositories::CategoryRepository;
use crate::shared::constants::MAX_CATEGORY_DEPTH;

/// Service for category operations
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    /// Create a new category
    pub async fn create(&self, dto: CategoryRequestDto) -> Result<CategoryResponseDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.ensure_valid_parent(None, dto.parent_id).await?;

        let category = self.repo.create(dto.into()).await?;
        Ok(category.into())
    }

    /// Get category by ID, with its parent resolved
    pub async fn get_by_id(&self, id: i64) -> Result<CategoryResponseDto> {
        Ok(self.repo.get_by_id(id).await?.into())
    }

    /// Replace all mutable fields of a category
    pub async fn update(&self, id: i64, dto: CategoryRequestDto) -> Result<CategoryResponseDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.ensure_valid_parent(Some(id), dto.parent_id).await?;

        let category = self.repo.update(id, dto.into()).await?;
        Ok(category.into())
    }

    /// Soft-delete a category that no product references
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await
    }

    /// List all categories (flat list)
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.repo.list().await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// List all categories as tree structure
    pub async fn list_tree(&self) -> Result<Vec<CategoryTreeDto>> {
        let categories = self.repo.list().await?;
        Ok(CategoryTreeDto::build_tree(categories))
    }

    /// The parent must exist, and walking up from it must never reach the
    /// category being saved.
    async fn ensure_valid_parent(&self, id: Option<i64>, parent_id: Option<i64>) -> Result<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };

        if id == Some(parent_id) {
            return Err(AppError::Validation(
                "a category cannot be its own parent".to_string(),
            ));
        }

        let parent = match self.repo.get_by_id(parent_id).await {
            Ok(parent) => parent,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::Validation(format!(
                    "parent category {} does not exist",
                    parent_id
                )))
            }
            Err(e) => return Err(e),
        };

        let Some(id) = id else {
            return Ok(());
        };

        let mut current: Category = parent;
        for _ in 0..MAX_CATEGORY_DEPTH {
            match current.parent_id {
                None => return Ok(()),
                Some(ancestor_id) if ancestor_id == id => {
                    return Err(AppError::Validation(
                        "category hierarchy cannot contain cycles".to_string(),
                    ))
                }
                Some(ancestor_id) => match self.repo.get_by_id(ancestor_id).await {
                    Ok(ancestor) => current = ancestor,
                    // A soft-deleted ancestor ends the live chain
                    Err(AppError::NotFound(_)) => return Ok(()),
                    Err(e) => return Err(e),
                },
            }
        }

        Err(AppError::Validation(format!(
            "category hierarchy cannot be deeper than {} levels",
            MAX_CATEGORY_DEPTH
        )))
    }
}
