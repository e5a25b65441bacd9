use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::categories::models::{Category, CategoryInput};
use crate::shared::validation::validate_not_blank;

fn default_true() -> bool {
    true
}

/// Request body for creating or fully replacing a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequestDto {
    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank", message = "category name is required"),
        length(max = 100)
    )]
    pub name: String,

    pub description: Option<String>,

    pub parent_id: Option<i64>,

    #[validate(length(max = 255))]
    pub image_url: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<CategoryRequestDto> for CategoryInput {
    fn from(dto: CategoryRequestDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            description: dto.description,
            parent_id: dto.parent_id,
            image_url: dto.image_url,
            is_active: dto.is_active,
        }
    }
}

/// Query params for listing categories
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListCategoriesQuery {
    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,
}

/// Minimal category reference embedded in other responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummaryDto {
    pub id: i64,
    pub name: String,
}

impl From<&Category> for CategorySummaryDto {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
        }
    }
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponseDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub parent: Option<CategorySummaryDto>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            parent: c.parent.as_deref().map(CategorySummaryDto::from),
            id: c.id,
            name: c.name,
            description: c.description,
            parent_id: c.parent_id,
            image_url: c.image_url,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Build tree from flat list of categories.
    ///
    /// Categories whose parent is absent from the list (for example a
    /// soft-deleted parent) are promoted to roots. A parent cycle left by
    /// concurrent re-parenting is broken at one of its members, which is
    /// promoted the same way, so every category appears exactly once.
    pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryTreeDto> {
        let by_id: HashMap<i64, &Category> = categories.iter().map(|c| (c.id, c)).collect();
        let mut placed = HashSet::new();

        let mut roots: Vec<CategoryTreeDto> = Vec::new();
        for root in categories
            .iter()
            .filter(|c| c.parent_id.map_or(true, |pid| !by_id.contains_key(&pid)))
        {
            roots.push(Self::build_node(root, &categories, &mut placed));
        }

        // Anything still unplaced hangs off a cycle
        for category in &categories {
            if !placed.contains(&category.id) {
                let member = cycle_member(category, &by_id);
                roots.push(Self::build_node(member, &categories, &mut placed));
            }
        }

        roots
    }

    fn build_node(
        category: &Category,
        all_categories: &[Category],
        placed: &mut HashSet<i64>,
    ) -> CategoryTreeDto {
        placed.insert(category.id);

        let mut children = Vec::new();
        for child in all_categories
            .iter()
            .filter(|c| c.parent_id == Some(category.id))
        {
            if !placed.contains(&child.id) {
                children.push(Self::build_node(child, all_categories, placed));
            }
        }

        CategoryTreeDto {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
            image_url: category.image_url.clone(),
            is_active: category.is_active,
            children,
        }
    }
}

/// Follow parent links from `start` until one repeats; that category lies on the cycle.
fn cycle_member<'a>(start: &'a Category, by_id: &HashMap<i64, &'a Category>) -> &'a Category {
    let mut seen = HashSet::new();
    let mut current = start;
    while seen.insert(current.id) {
        match current.parent_id.and_then(|pid| by_id.get(&pid).copied()) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current
}
