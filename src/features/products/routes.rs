use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::products::handlers;
use crate::features::products::services::{ProductService, SearchService};

/// Create routes for the products feature (mounted under `/api/v1`)
pub fn routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/products/{id}/stock", patch(handlers::update_stock))
        .with_state(service)
}

/// Create the free-text search route (mounted under `/api/v1`)
pub fn search_routes(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/search", get(handlers::search_products))
        .with_state(service)
}
