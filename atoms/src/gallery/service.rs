use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;

use super::model::{CreateGalleryImagePayload, GalleryImage, MAX_UPLOAD_BYTES};
use crate::media;

fn parse_gallery_image(
    id: &str,
    item: &std::collections::HashMap<String, AttributeValue>,
) -> GalleryImage {
    GalleryImage {
        id: id.to_string(),
        name: item
            .get("name")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        url: item
            .get("url")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        created_at: item
            .get("created_at")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        size: item
            .get("size")
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse().ok())
            .unwrap_or(0),
    }
}

/// List gallery images, newest first.
pub async fn list_gallery_images(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Vec<GalleryImage>, String> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S("GALLERY".to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("IMAGE#".to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB query error: {}", e))?;

    let mut images = Vec::new();
    for item in result.items() {
        if let Some(sk) = item.get("SK").and_then(|v| v.as_s().ok()) {
            if let Some(image_id) = sk.strip_prefix("IMAGE#") {
                images.push(parse_gallery_image(image_id, item));
            }
        }
    }

    images.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(images)
}

/// Get a specific gallery image
pub async fn get_gallery_image(
    client: &DynamoClient,
    table_name: &str,
    image_id: &str,
) -> Result<GalleryImage, String> {
    let sk = format!("IMAGE#{}", image_id);

    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("GALLERY".to_string()))
        .key("SK", AttributeValue::S(sk))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    if let Some(item) = result.item() {
        Ok(parse_gallery_image(image_id, item))
    } else {
        Err("Image not found".to_string())
    }
}

/// Upload a new gallery image. Data URIs are decoded and pushed to the
/// bucket under `gallery-{id}.{ext}`; durable URLs are stored as-is.
pub async fn create_gallery_image(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    payload: CreateGalleryImagePayload,
) -> Result<GalleryImage, String> {
    if payload.name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    if media::is_blob_url(&payload.data) {
        return Err("blob: URLs are not durable; upload the image data instead".to_string());
    }

    let image_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    let (url, size) = match media::parse_data_uri(&payload.data) {
        Some(decoded) => {
            let size = decoded.bytes.len() as u64;
            if size > MAX_UPLOAD_BYTES {
                return Err("Image is too large (5MB max)".to_string());
            }
            let key = media::object_key("gallery", &image_id, &decoded.extension);
            let url = media::upload_object(s3_client, bucket_name, &key, decoded).await?;
            (url, size)
        }
        None => (payload.data.clone(), 0),
    };

    let sk = format!("IMAGE#{}", image_id);

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S("GALLERY".to_string()))
        .item("SK", AttributeValue::S(sk))
        .item("name", AttributeValue::S(payload.name.clone()))
        .item("url", AttributeValue::S(url.clone()))
        .item("created_at", AttributeValue::S(now.clone()))
        .item("size", AttributeValue::N(size.to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB put_item error: {}", e))?;

    Ok(GalleryImage {
        id: image_id,
        name: payload.name,
        url,
        created_at: now,
        size,
    })
}

/// Delete a gallery image. The bucket object is removed best-effort before
/// the row.
pub async fn delete_gallery_image(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    image_id: &str,
) -> Result<(), String> {
    let img = get_gallery_image(client, table_name, image_id).await?;

    media::remove_object_best_effort(s3_client, bucket_name, &img.url).await;

    let sk = format!("IMAGE#{}", image_id);

    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("GALLERY".to_string()))
        .key("SK", AttributeValue::S(sk))
        .send()
        .await
        .map_err(|e| format!("DynamoDB delete_item error: {}", e))?;

    Ok(())
}
