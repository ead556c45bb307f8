use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;
use lambda_http::{http::StatusCode, Body, Error as LambdaError, Response};

use super::model::CreateGalleryImagePayload;
use super::service::{create_gallery_image, delete_gallery_image, list_gallery_images};

fn json_response(status: StatusCode, body: String) -> Result<Response<Body>, LambdaError> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(body.into())
        .map_err(Box::new)?)
}

fn error_status(e: &str) -> StatusCode {
    if e == "Image not found" {
        StatusCode::NOT_FOUND
    } else if e.ends_with("is required") || e.contains("too large") || e.starts_with("blob:") {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// HTTP Handler: GET /gallery
pub async fn list_gallery_images_handler(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, LambdaError> {
    match list_gallery_images(client, table_name).await {
        Ok(images) => json_response(StatusCode::OK, serde_json::to_string(&images)?),
        Err(e) => json_response(error_status(&e), serde_json::json!({"error": e}).to_string()),
    }
}

/// HTTP Handler: POST /gallery
pub async fn create_gallery_image_handler(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: CreateGalleryImagePayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": format!("Invalid request body: {}", e)}).to_string(),
            )
        }
    };

    match create_gallery_image(client, s3_client, table_name, bucket_name, payload).await {
        Ok(img) => json_response(StatusCode::CREATED, serde_json::to_string(&img)?),
        Err(e) => json_response(error_status(&e), serde_json::json!({"error": e}).to_string()),
    }
}

/// HTTP Handler: DELETE /gallery/{id}
pub async fn delete_gallery_image_handler(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    image_id: &str,
) -> Result<Response<Body>, LambdaError> {
    match delete_gallery_image(client, s3_client, table_name, bucket_name, image_id).await {
        Ok(_) => Ok(Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header("Access-Control-Allow-Origin", "*")
            .body(Body::Empty)
            .map_err(Box::new)?),
        Err(e) => json_response(error_status(&e), serde_json::json!({"error": e}).to_string()),
    }
}
