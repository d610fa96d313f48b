mod api;
mod product;

pub use api::{HealthResponse, ListParams, ProductPage, ProductStats, SearchParams};
pub use product::{Product, ProductFields};
