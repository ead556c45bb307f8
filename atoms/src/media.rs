use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use base64::Engine;

/// Decoded `data:` URI payload.
#[derive(Debug)]
pub struct DecodedImage {
    pub content_type: String,
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Parse a base64 `data:` URI into content type, file extension and raw bytes.
/// Returns None for anything that is not a data URI.
pub fn parse_data_uri(value: &str) -> Option<DecodedImage> {
    let rest = value.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let meta = meta.strip_suffix(";base64")?;

    let content_type = if meta.is_empty() {
        "image/png".to_string()
    } else {
        meta.to_string()
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .ok()?;

    // Prefer the real format over whatever the mime string claims
    let extension = match image::guess_format(&bytes) {
        Ok(image::ImageFormat::Jpeg) => "jpg".to_string(),
        Ok(image::ImageFormat::Gif) => "gif".to_string(),
        Ok(image::ImageFormat::WebP) => "webp".to_string(),
        Ok(image::ImageFormat::Png) => "png".to_string(),
        _ => content_type
            .rsplit('/')
            .next()
            .unwrap_or("png")
            .to_string(),
    };

    Some(DecodedImage {
        content_type,
        extension,
        bytes,
    })
}

/// `blob:` object URLs only resolve inside the browser session that created
/// them; they are never durable and must not be persisted.
pub fn is_blob_url(value: &str) -> bool {
    value.starts_with("blob:")
}

pub fn object_key(prefix: &str, id: &str, extension: &str) -> String {
    format!("{}-{}.{}", prefix, id, extension)
}

pub fn public_url(bucket: &str, key: &str) -> String {
    format!("https://{}.s3.amazonaws.com/{}", bucket, key)
}

/// Resolve the stored image reference for an achievement.
///
/// Data URIs are decoded and uploaded to the bucket under a deterministic key
/// (`achievement-{id}.{ext}`, upsert semantics), and the public URL is
/// returned. Durable URLs pass through unchanged. `blob:` URLs are rejected.
pub async fn store_achievement_image(
    s3_client: &S3Client,
    bucket_name: &str,
    achievement_id: &str,
    img: &str,
) -> Result<String, String> {
    if img.is_empty() {
        return Ok(crate::achievements::model::PLACEHOLDER_IMAGE.to_string());
    }

    if is_blob_url(img) {
        return Err("blob: URLs are not durable; upload the image data instead".to_string());
    }

    let Some(decoded) = parse_data_uri(img) else {
        return Ok(img.to_string());
    };

    let key = object_key("achievement", achievement_id, &decoded.extension);
    upload_object(s3_client, bucket_name, &key, decoded).await
}

pub async fn upload_object(
    s3_client: &S3Client,
    bucket_name: &str,
    key: &str,
    decoded: DecodedImage,
) -> Result<String, String> {
    s3_client
        .put_object()
        .bucket(bucket_name)
        .key(key)
        .content_type(&decoded.content_type)
        .body(ByteStream::from(decoded.bytes))
        .send()
        .await
        .map_err(|e| format!("S3 put_object error: {}", e))?;

    Ok(public_url(bucket_name, key))
}

/// Delete the object behind a public URL. Best effort: failures are logged
/// and swallowed so row deletion can proceed.
pub async fn remove_object_best_effort(s3_client: &S3Client, bucket_name: &str, url: &str) {
    let Some(key) = key_from_public_url(bucket_name, url) else {
        return;
    };

    if let Err(e) = s3_client
        .delete_object()
        .bucket(bucket_name)
        .key(&key)
        .send()
        .await
    {
        tracing::warn!("Failed to delete object {}: {}", key, e);
    }
}

/// Extract the object key from a public bucket URL. Returns None for
/// placeholders, data URIs and URLs pointing at other hosts.
pub fn key_from_public_url(bucket_name: &str, url: &str) -> Option<String> {
    let prefix = format!("https://{}.s3.amazonaws.com/", bucket_name);
    let key = url.strip_prefix(&prefix)?;
    // Drop cache-busting query params
    let key = key.split('?').next().unwrap_or(key);
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn parses_png_data_uri() {
        let decoded = parse_data_uri(PNG_DATA_URI).unwrap();
        assert_eq!(decoded.content_type, "image/png");
        assert_eq!(decoded.extension, "png");
        assert!(!decoded.bytes.is_empty());
    }

    #[test]
    fn rejects_non_data_uris() {
        assert!(parse_data_uri("https://example.com/a.png").is_none());
        assert!(parse_data_uri("blob:https://example.com/abc").is_none());
        assert!(parse_data_uri("data:image/png,not-base64-marker").is_none());
    }

    #[test]
    fn detects_blob_urls() {
        assert!(is_blob_url("blob:https://example.com/abc"));
        assert!(!is_blob_url("https://example.com/a.png"));
    }

    #[test]
    fn object_keys_are_deterministic() {
        assert_eq!(
            object_key("achievement", "a1", "png"),
            "achievement-a1.png"
        );
        assert_eq!(
            public_url("images", "achievement-a1.png"),
            "https://images.s3.amazonaws.com/achievement-a1.png"
        );
    }

    #[test]
    fn extracts_key_from_public_url() {
        assert_eq!(
            key_from_public_url("images", "https://images.s3.amazonaws.com/achievement-a1.png"),
            Some("achievement-a1.png".to_string())
        );
        assert_eq!(
            key_from_public_url(
                "images",
                "https://images.s3.amazonaws.com/achievement-a1.png?t=123"
            ),
            Some("achievement-a1.png".to_string())
        );
        assert_eq!(key_from_public_url("images", "/placeholder.svg"), None);
        assert_eq!(
            key_from_public_url("images", "https://other.s3.amazonaws.com/a.png"),
            None
        );
    }
}
