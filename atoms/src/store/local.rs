use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;

use super::AchievementStore;
use crate::achievements::model::{repair_ids, resolve_id, Achievement};
use crate::media;

/// File-backed store: the whole achievement list is one JSON blob, rewritten
/// on every mutation. A missing or unparseable file falls back to the seed
/// list handed in at open time.
pub struct LocalStore {
    path: PathBuf,
    achievements: RwLock<Vec<Achievement>>,
}

impl LocalStore {
    pub async fn open(path: impl Into<PathBuf>, seed: Vec<Achievement>) -> Self {
        let path = path.into();

        let mut achievements = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<Vec<Achievement>>(&raw) {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!(
                        "Malformed achievements file {}, falling back to seed data: {}",
                        path.display(),
                        e
                    );
                    seed
                }
            },
            Err(_) => seed,
        };

        repair_ids(&mut achievements);

        LocalStore {
            path,
            achievements: RwLock::new(achievements),
        }
    }

    async fn persist(&self, achievements: &[Achievement]) -> Result<(), String> {
        let raw = serde_json::to_string(achievements)
            .map_err(|e| format!("Failed to serialize achievements: {}", e))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| format!("Failed to write {}: {}", self.path.display(), e))
    }
}

#[async_trait]
impl AchievementStore for LocalStore {
    async fn list(&self) -> Result<Vec<Achievement>, String> {
        Ok(self.achievements.read().await.clone())
    }

    async fn add(&self, mut achievement: Achievement) -> Result<Achievement, String> {
        if media::is_blob_url(&achievement.image) {
            return Err("blob: URLs are not durable; upload the image data instead".to_string());
        }

        let mut achievements = self.achievements.write().await;

        achievement.id = resolve_id(Some(&achievement.id));
        while achievements.iter().any(|a| a.id == achievement.id) {
            achievement.id = resolve_id(None);
        }
        if achievement.created_at.is_empty() {
            achievement.created_at = chrono::Utc::now().to_rfc3339();
        }

        let mut next = achievements.clone();
        next.push(achievement.clone());
        self.persist(&next).await?;
        *achievements = next;

        Ok(achievement)
    }

    async fn update(&self, achievement: Achievement) -> Result<Achievement, String> {
        if media::is_blob_url(&achievement.image) {
            return Err("blob: URLs are not durable; upload the image data instead".to_string());
        }

        let mut achievements = self.achievements.write().await;

        let mut next = achievements.clone();
        let slot = next
            .iter_mut()
            .find(|a| a.id == achievement.id)
            .ok_or_else(|| "Achievement not found".to_string())?;
        *slot = achievement.clone();

        self.persist(&next).await?;
        *achievements = next;

        Ok(achievement)
    }

    async fn remove(&self, id: &str) -> Result<(), String> {
        let mut achievements = self.achievements.write().await;

        if !achievements.iter().any(|a| a.id == id) {
            return Err("Achievement not found".to_string());
        }

        let next: Vec<Achievement> = achievements
            .iter()
            .filter(|a| a.id != id)
            .cloned()
            .collect();

        self.persist(&next).await?;
        *achievements = next;

        Ok(())
    }

    async fn set_image(&self, id: &str, img: &str) -> Result<Achievement, String> {
        if media::is_blob_url(img) {
            return Err("blob: URLs are not durable; upload the image data instead".to_string());
        }

        let mut achievements = self.achievements.write().await;

        let mut next = achievements.clone();
        let slot = next
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| "Achievement not found".to_string())?;
        slot.image = img.to_string();
        let updated = slot.clone();

        self.persist(&next).await?;
        *achievements = next;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::model::Rarity;

    fn achievement(id: &str, title: &str) -> Achievement {
        Achievement {
            id: id.to_string(),
            title: title.to_string(),
            description: "desc".to_string(),
            rarity: Rarity::Common,
            category: "building".to_string(),
            image: "/placeholder.svg".to_string(),
            requirements: String::new(),
            reward: String::new(),
            unlocked: false,
            created_at: String::new(),
        }
    }

    fn store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("achievements.json")
    }

    #[tokio::test]
    async fn add_without_id_generates_unique_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(store_path(&dir), vec![]).await;

        let a = store.add(achievement("", "First")).await.unwrap();
        let b = store.add(achievement("", "Second")).await.unwrap();

        assert!(!a.id.is_empty());
        assert!(!b.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn add_with_taken_id_gets_a_fresh_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(store_path(&dir), vec![]).await;

        store.add(achievement("a1", "First")).await.unwrap();
        let dup = store.add(achievement("a1", "Second")).await.unwrap();

        assert_ne!(dup.id, "a1");
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir);

        let store = LocalStore::open(&path, vec![]).await;
        store.add(achievement("a1", "First")).await.unwrap();
        let mut updated = achievement("a1", "First edited");
        updated.unlocked = true;
        store.update(updated.clone()).await.unwrap();
        let expected = store.list().await.unwrap();

        // A second open against the same file sees an equal list
        let reopened = LocalStore::open(&path, vec![]).await;
        assert_eq!(reopened.list().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn malformed_file_falls_back_to_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir);
        std::fs::write(&path, "{not json").unwrap();

        let seed = vec![achievement("seed-1", "Seeded")];
        let store = LocalStore::open(&path, seed).await;

        let list = store.list().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "seed-1");
    }

    #[tokio::test]
    async fn remove_deletes_exactly_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(store_path(&dir), vec![]).await;
        store.add(achievement("a1", "First")).await.unwrap();
        store.add(achievement("a2", "Second")).await.unwrap();

        store.remove("a1").await.unwrap();

        let list = store.list().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "a2");
        assert!(store.remove("a1").await.is_err());
    }

    #[tokio::test]
    async fn set_image_rejects_blob_urls() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(store_path(&dir), vec![]).await;
        store.add(achievement("a1", "First")).await.unwrap();

        let err = store
            .set_image("a1", "blob:https://example.com/xyz")
            .await
            .unwrap_err();
        assert!(err.contains("not durable"));

        // Store unchanged on failure
        let list = store.list().await.unwrap();
        assert_eq!(list[0].image, "/placeholder.svg");

        let updated = store
            .set_image("a1", "https://images.s3.amazonaws.com/achievement-a1.png")
            .await
            .unwrap();
        assert!(updated.image.ends_with("achievement-a1.png"));
    }
}
