pub mod product_dto;
pub mod search_dto;

pub use product_dto::{
    CreateProductDto, ListProductsQuery, ProductResponseDto, StockUpdateDto, UpdateProductDto,
};
pub use search_dto::SearchQuery;
