pub mod product_handler;
pub mod search_handler;

pub use product_handler::*;
pub use search_handler::*;
