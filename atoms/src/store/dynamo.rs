use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;

use super::AchievementStore;
use crate::achievements::model::{resolve_id, Achievement};
use crate::achievements::service;
use crate::media;

/// Hosted-backend store: row-per-achievement DynamoDB table plus an S3
/// bucket for image objects.
pub struct DynamoStore {
    client: DynamoClient,
    s3_client: S3Client,
    table_name: String,
    bucket_name: String,
}

impl DynamoStore {
    pub fn new(
        client: DynamoClient,
        s3_client: S3Client,
        table_name: impl Into<String>,
        bucket_name: impl Into<String>,
    ) -> Self {
        DynamoStore {
            client,
            s3_client,
            table_name: table_name.into(),
            bucket_name: bucket_name.into(),
        }
    }
}

#[async_trait]
impl AchievementStore for DynamoStore {
    async fn list(&self) -> Result<Vec<Achievement>, String> {
        service::list_achievements(&self.client, &self.table_name).await
    }

    async fn add(&self, mut achievement: Achievement) -> Result<Achievement, String> {
        achievement.id = resolve_id(Some(&achievement.id));
        if achievement.created_at.is_empty() {
            achievement.created_at = chrono::Utc::now().to_rfc3339();
        }

        achievement.image = media::store_achievement_image(
            &self.s3_client,
            &self.bucket_name,
            &achievement.id,
            &achievement.image,
        )
        .await?;

        service::put_achievement(&self.client, &self.table_name, &achievement).await?;

        Ok(achievement)
    }

    async fn update(&self, mut achievement: Achievement) -> Result<Achievement, String> {
        // Ensure the row exists; a full put would silently insert otherwise
        service::get_achievement(&self.client, &self.table_name, &achievement.id).await?;

        achievement.image = media::store_achievement_image(
            &self.s3_client,
            &self.bucket_name,
            &achievement.id,
            &achievement.image,
        )
        .await?;

        service::put_achievement(&self.client, &self.table_name, &achievement).await?;

        Ok(achievement)
    }

    async fn remove(&self, id: &str) -> Result<(), String> {
        service::delete_achievement(
            &self.client,
            &self.s3_client,
            &self.table_name,
            &self.bucket_name,
            id,
        )
        .await
    }

    async fn set_image(&self, id: &str, img: &str) -> Result<Achievement, String> {
        service::set_achievement_image(
            &self.client,
            &self.s3_client,
            &self.table_name,
            &self.bucket_name,
            id,
            img,
        )
        .await
    }
}
