// Re-export model types and service functions
pub mod http;
pub mod model;
pub mod service;

pub use model::{
    Achievement, CreateAchievementPayload, Rarity, SetImagePayload, UpdateAchievementPayload,
};
pub use http::*;
pub use service::*;
