use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::health::handler as health_handler;
use crate::features::products::{dtos as products_dtos, handlers as products_handlers};
use crate::shared::types::{ApiResponse, Meta, Paginated};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Products
        products_handlers::list_products,
        products_handlers::get_product,
        products_handlers::create_product,
        products_handlers::update_product,
        products_handlers::delete_product,
        products_handlers::update_stock,
        // Search
        products_handlers::search_products,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Health
        health_handler::health_check,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Products
            products_dtos::CreateProductDto,
            products_dtos::UpdateProductDto,
            products_dtos::StockUpdateDto,
            products_dtos::ProductResponseDto,
            Paginated<products_dtos::ProductResponseDto>,
            ApiResponse<products_dtos::ProductResponseDto>,
            ApiResponse<Paginated<products_dtos::ProductResponseDto>>,
            // Categories
            categories_dtos::CategoryRequestDto,
            categories_dtos::CategorySummaryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            // Health
            health_handler::HealthResponse,
        )
    ),
    tags(
        (name = "products", description = "Product catalog management"),
        (name = "categories", description = "Category hierarchy management"),
        (name = "search", description = "Free-text product search"),
        (name = "health", description = "Service health"),
    ),
    info(
        title = "Catalog Service API",
        version = "0.1.0",
        description = "API documentation for the catalog service",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
