use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;
use lambda_http::{http::StatusCode, Body, Error as LambdaError, Response};

use super::model::{CreateAchievementPayload, Rarity, SetImagePayload, UpdateAchievementPayload};
use super::service::{
    create_achievement, delete_achievement, get_achievement, set_achievement_image,
    update_achievement,
};

fn json_response(status: StatusCode, body: String) -> Result<Response<Body>, LambdaError> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(body.into())
        .map_err(Box::new)?)
}

fn error_status(e: &str) -> StatusCode {
    if e == "Achievement not found" {
        StatusCode::NOT_FOUND
    } else if e.ends_with("is required") || e.starts_with("blob:") {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// HTTP Handler: GET /achievements/{id}
pub async fn get_achievement_handler(
    client: &DynamoClient,
    table_name: &str,
    achievement_id: &str,
) -> Result<Response<Body>, LambdaError> {
    match get_achievement(client, table_name, achievement_id).await {
        Ok(achievement) => json_response(StatusCode::OK, serde_json::to_string(&achievement)?),
        Err(e) => json_response(error_status(&e), serde_json::json!({"error": e}).to_string()),
    }
}

/// HTTP Handler: POST /achievements
pub async fn create_achievement_handler(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: CreateAchievementPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": format!("Invalid request body: {}", e)}).to_string(),
            )
        }
    };

    match create_achievement(client, s3_client, table_name, bucket_name, payload).await {
        Ok(achievement) => json_response(StatusCode::CREATED, serde_json::to_string(&achievement)?),
        Err(e) => json_response(error_status(&e), serde_json::json!({"error": e}).to_string()),
    }
}

/// HTTP Handler: PATCH /achievements/{id}
pub async fn update_achievement_handler(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    achievement_id: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: UpdateAchievementPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": format!("Invalid request body: {}", e)}).to_string(),
            )
        }
    };

    match update_achievement(
        client,
        s3_client,
        table_name,
        bucket_name,
        achievement_id,
        payload,
    )
    .await
    {
        Ok(achievement) => json_response(StatusCode::OK, serde_json::to_string(&achievement)?),
        Err(e) => json_response(error_status(&e), serde_json::json!({"error": e}).to_string()),
    }
}

/// HTTP Handler: PUT /achievements/{id}/image
pub async fn set_achievement_image_handler(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    achievement_id: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: SetImagePayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": format!("Invalid request body: {}", e)}).to_string(),
            )
        }
    };

    match set_achievement_image(
        client,
        s3_client,
        table_name,
        bucket_name,
        achievement_id,
        &payload.image,
    )
    .await
    {
        Ok(achievement) => json_response(StatusCode::OK, serde_json::to_string(&achievement)?),
        Err(e) => json_response(error_status(&e), serde_json::json!({"error": e}).to_string()),
    }
}

/// HTTP Handler: DELETE /achievements/{id}
pub async fn delete_achievement_handler(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    achievement_id: &str,
) -> Result<Response<Body>, LambdaError> {
    match delete_achievement(client, s3_client, table_name, bucket_name, achievement_id).await {
        Ok(_) => Ok(Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header("Access-Control-Allow-Origin", "*")
            .body(Body::Empty)
            .map_err(Box::new)?),
        Err(e) => json_response(error_status(&e), serde_json::json!({"error": e}).to_string()),
    }
}

/// HTTP Handler: GET /rarities
pub async fn list_rarities_handler() -> Result<Response<Body>, LambdaError> {
    let rarities: Vec<serde_json::Value> = Rarity::all()
        .into_iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id(),
                "name": r.display_name(),
                "color": r.color(),
            })
        })
        .collect();

    json_response(StatusCode::OK, serde_json::to_string(&rarities)?)
}
