use serde::{Deserialize, Serialize};

/// GalleryImage domain model - a media-library asset, independent of any
/// achievement.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GalleryImage {
    pub id: String,
    pub name: String,
    pub url: String,
    pub created_at: String,
    pub size: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreateGalleryImagePayload {
    pub name: String,
    /// Data URI with the image payload, or an already-durable URL
    pub data: String,
}

/// Upload cap, matching the admin UI limit.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
