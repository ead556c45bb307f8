pub mod http;
pub mod model;
pub mod service;

pub use model::{Category, CreateCategoryPayload, UpdateCategoryPayload, ALL_CATEGORY_ID};
pub use http::*;
pub use service::*;
