pub mod dynamo;
pub mod local;

use async_trait::async_trait;

use crate::achievements::model::Achievement;

/// Persistence contract for the achievements collection. The two strategies
/// (local JSON blob, hosted table + object storage) are interchangeable
/// behind this trait; in-memory copies held by sessions are caches that
/// reconcile against whichever store backs them.
///
/// Every method either fully applies or leaves the store unchanged.
#[async_trait]
pub trait AchievementStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Achievement>, String>;
    async fn add(&self, achievement: Achievement) -> Result<Achievement, String>;
    async fn update(&self, achievement: Achievement) -> Result<Achievement, String>;
    async fn remove(&self, id: &str) -> Result<(), String>;
    async fn set_image(&self, id: &str, img: &str) -> Result<Achievement, String>;
}

pub use dynamo::DynamoStore;
pub use local::LocalStore;
