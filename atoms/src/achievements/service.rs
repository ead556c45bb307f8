use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;
use std::collections::HashMap;

use super::model::{
    Achievement, CreateAchievementPayload, Rarity, UpdateAchievementPayload, PLACEHOLDER_IMAGE,
};
use crate::media;

fn parse_achievement(
    id: &str,
    item: &HashMap<String, AttributeValue>,
) -> Achievement {
    Achievement {
        id: id.to_string(),
        title: item
            .get("title")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        description: item
            .get("description")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        rarity: item
            .get("rarity")
            .and_then(|v| v.as_s().ok())
            .and_then(|s| Rarity::parse(s))
            .unwrap_or(Rarity::Common),
        category: item
            .get("category")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        image: item
            .get("image_path")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        requirements: item
            .get("requirements")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        reward: item
            .get("reward")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        unlocked: item
            .get("unlocked")
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false),
        created_at: item
            .get("created_at")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
    }
}

/// Load all achievements (pure domain logic, no HTTP).
/// Used by the showcase layer to apply gallery filters.
pub async fn list_achievements(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Vec<Achievement>, String> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S("ACHIEVEMENT".to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("ACHIEVEMENT#".to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB query error: {}", e))?;

    let mut achievements = Vec::new();
    for item in result.items() {
        if let Some(sk) = item.get("SK").and_then(|v| v.as_s().ok()) {
            if let Some(id) = sk.strip_prefix("ACHIEVEMENT#") {
                achievements.push(parse_achievement(id, item));
            }
        }
    }

    // Oldest first so the gallery order is stable across reloads
    achievements.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    Ok(achievements)
}

/// Get a specific achievement
pub async fn get_achievement(
    client: &DynamoClient,
    table_name: &str,
    achievement_id: &str,
) -> Result<Achievement, String> {
    let sk = format!("ACHIEVEMENT#{}", achievement_id);

    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("ACHIEVEMENT".to_string()))
        .key("SK", AttributeValue::S(sk))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    if let Some(item) = result.item() {
        Ok(parse_achievement(achievement_id, item))
    } else {
        Err("Achievement not found".to_string())
    }
}

/// Create a new achievement. Generates a UUID when the payload carries no id
/// and resolves the image to a durable URL before the row is written.
pub async fn create_achievement(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    payload: CreateAchievementPayload,
) -> Result<Achievement, String> {
    super::model::validate(&payload.title, &payload.description)?;

    let achievement_id = super::model::resolve_id(payload.id.as_deref());
    let now = chrono::Utc::now().to_rfc3339();

    let image = match &payload.image {
        Some(img) => {
            media::store_achievement_image(s3_client, bucket_name, &achievement_id, img).await?
        }
        None => PLACEHOLDER_IMAGE.to_string(),
    };

    let achievement = Achievement {
        id: achievement_id.clone(),
        title: payload.title,
        description: payload.description,
        rarity: payload.rarity,
        category: payload.category,
        image,
        requirements: payload.requirements.unwrap_or_default(),
        reward: payload.reward.unwrap_or_default(),
        unlocked: payload.unlocked.unwrap_or(false),
        created_at: now,
    };

    put_achievement(client, table_name, &achievement).await?;

    Ok(achievement)
}

/// Write the full achievement row (insert or replace).
pub async fn put_achievement(
    client: &DynamoClient,
    table_name: &str,
    achievement: &Achievement,
) -> Result<(), String> {
    let sk = format!("ACHIEVEMENT#{}", achievement.id);

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S("ACHIEVEMENT".to_string()))
        .item("SK", AttributeValue::S(sk))
        .item("title", AttributeValue::S(achievement.title.clone()))
        .item(
            "description",
            AttributeValue::S(achievement.description.clone()),
        )
        .item("rarity", AttributeValue::S(achievement.rarity.id().to_string()))
        .item("category", AttributeValue::S(achievement.category.clone()))
        .item("image_path", AttributeValue::S(achievement.image.clone()))
        .item(
            "requirements",
            AttributeValue::S(achievement.requirements.clone()),
        )
        .item("reward", AttributeValue::S(achievement.reward.clone()))
        .item("unlocked", AttributeValue::Bool(achievement.unlocked))
        .item("created_at", AttributeValue::S(achievement.created_at.clone()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB put_item error: {}", e))?;

    Ok(())
}

/// Update an achievement. Only the fields present in the payload change.
pub async fn update_achievement(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    achievement_id: &str,
    payload: UpdateAchievementPayload,
) -> Result<Achievement, String> {
    // Ensure the row exists before building the update
    let current = get_achievement(client, table_name, achievement_id).await?;

    if let Some(title) = &payload.title {
        super::model::validate(title, payload.description.as_deref().unwrap_or(&current.description))?;
    } else if let Some(description) = &payload.description {
        super::model::validate(&current.title, description)?;
    }

    let sk = format!("ACHIEVEMENT#{}", achievement_id);

    let mut update_expr = vec![];
    let mut expr_names = HashMap::new();
    let mut expr_values = HashMap::new();

    if let Some(title) = payload.title {
        update_expr.push("#title = :title");
        expr_names.insert("#title".to_string(), "title".to_string());
        expr_values.insert(":title".to_string(), AttributeValue::S(title));
    }

    if let Some(description) = payload.description {
        update_expr.push("#description = :description");
        expr_names.insert("#description".to_string(), "description".to_string());
        expr_values.insert(":description".to_string(), AttributeValue::S(description));
    }

    if let Some(rarity) = payload.rarity {
        update_expr.push("rarity = :rarity");
        expr_values.insert(
            ":rarity".to_string(),
            AttributeValue::S(rarity.id().to_string()),
        );
    }

    if let Some(category) = payload.category {
        update_expr.push("category = :category");
        expr_values.insert(":category".to_string(), AttributeValue::S(category));
    }

    if let Some(img) = payload.image {
        let resolved =
            media::store_achievement_image(s3_client, bucket_name, achievement_id, &img).await?;
        update_expr.push("image_path = :image_path");
        expr_values.insert(":image_path".to_string(), AttributeValue::S(resolved));
    }

    if let Some(requirements) = payload.requirements {
        update_expr.push("requirements = :requirements");
        expr_values.insert(
            ":requirements".to_string(),
            AttributeValue::S(requirements),
        );
    }

    if let Some(reward) = payload.reward {
        update_expr.push("reward = :reward");
        expr_values.insert(":reward".to_string(), AttributeValue::S(reward));
    }

    if let Some(unlocked) = payload.unlocked {
        update_expr.push("unlocked = :unlocked");
        expr_values.insert(":unlocked".to_string(), AttributeValue::Bool(unlocked));
    }

    if !update_expr.is_empty() {
        let mut builder = client
            .update_item()
            .table_name(table_name)
            .key("PK", AttributeValue::S("ACHIEVEMENT".to_string()))
            .key("SK", AttributeValue::S(sk))
            .update_expression(format!("SET {}", update_expr.join(", ")));

        for (k, v) in expr_names {
            builder = builder.expression_attribute_names(k, v);
        }

        for (k, v) in expr_values {
            builder = builder.expression_attribute_values(k, v);
        }

        builder
            .send()
            .await
            .map_err(|e| format!("DynamoDB update_item error: {}", e))?;
    }

    get_achievement(client, table_name, achievement_id).await
}

/// Replace the image of an achievement: upload (or accept a durable URL) and
/// persist the resulting reference on the row.
pub async fn set_achievement_image(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    achievement_id: &str,
    img: &str,
) -> Result<Achievement, String> {
    // Ensure the row exists before uploading anything
    get_achievement(client, table_name, achievement_id).await?;

    let resolved =
        media::store_achievement_image(s3_client, bucket_name, achievement_id, img).await?;

    let sk = format!("ACHIEVEMENT#{}", achievement_id);

    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("ACHIEVEMENT".to_string()))
        .key("SK", AttributeValue::S(sk))
        .update_expression("SET image_path = :image_path")
        .expression_attribute_values(":image_path", AttributeValue::S(resolved))
        .send()
        .await
        .map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    get_achievement(client, table_name, achievement_id).await
}

/// Delete an achievement. The stored image object is removed best-effort
/// before the row goes away; a storage failure never blocks the delete.
pub async fn delete_achievement(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    achievement_id: &str,
) -> Result<(), String> {
    let achievement = get_achievement(client, table_name, achievement_id).await?;

    if !achievement.image.starts_with("/placeholder") {
        media::remove_object_best_effort(s3_client, bucket_name, &achievement.image).await;
    }

    let sk = format!("ACHIEVEMENT#{}", achievement_id);

    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("ACHIEVEMENT".to_string()))
        .key("SK", AttributeValue::S(sk))
        .send()
        .await
        .map_err(|e| format!("DynamoDB delete_item error: {}", e))?;

    Ok(())
}
