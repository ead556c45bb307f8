pub mod http;
pub mod model;
pub mod service;

pub use model::{CreateGalleryImagePayload, GalleryImage, MAX_UPLOAD_BYTES};
pub use http::*;
pub use service::*;
