pub mod product;
pub mod product_filter;

pub use product::{Attributes, NewProduct, Product, ProductUpdate};
pub use product_filter::{ProductFilter, ProductSortField, SortDirection};
