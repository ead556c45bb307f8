// ========== USER ==========
pub use blockhall_atoms::users::model::{CreateUserPayload, UpdateUserPayload, User};

// ========== ACHIEVEMENT ==========
pub use blockhall_atoms::achievements::model::{
    Achievement, CreateAchievementPayload, Rarity, SetImagePayload, UpdateAchievementPayload,
};

// ========== CATEGORY ==========
pub use blockhall_atoms::categories::model::{
    Category, CreateCategoryPayload, UpdateCategoryPayload,
};

// ========== GALLERY ==========
pub use blockhall_atoms::gallery::model::{CreateGalleryImagePayload, GalleryImage};
