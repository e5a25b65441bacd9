pub mod product_service;
pub mod search_service;

pub use product_service::ProductService;
pub use search_service::SearchService;
