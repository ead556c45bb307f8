use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error as LambdaError, Response};

use super::model::{CreateCategoryPayload, UpdateCategoryPayload};
use super::service::{create_category, delete_category, list_categories, update_category};

fn json_response(status: StatusCode, body: String) -> Result<Response<Body>, LambdaError> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(body.into())
        .map_err(Box::new)?)
}

fn error_status(e: &str) -> StatusCode {
    if e == "Category not found" {
        StatusCode::NOT_FOUND
    } else if e.contains("reserved") || e.ends_with("is required") {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// HTTP Handler: GET /categories
pub async fn list_categories_handler(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, LambdaError> {
    match list_categories(client, table_name).await {
        Ok(categories) => json_response(StatusCode::OK, serde_json::to_string(&categories)?),
        Err(e) => json_response(error_status(&e), serde_json::json!({"error": e}).to_string()),
    }
}

/// HTTP Handler: POST /categories
pub async fn create_category_handler(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: CreateCategoryPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": format!("Invalid request body: {}", e)}).to_string(),
            )
        }
    };

    match create_category(client, table_name, payload).await {
        Ok(category) => json_response(StatusCode::CREATED, serde_json::to_string(&category)?),
        Err(e) => json_response(error_status(&e), serde_json::json!({"error": e}).to_string()),
    }
}

/// HTTP Handler: PATCH /categories/{id}
pub async fn update_category_handler(
    client: &DynamoClient,
    table_name: &str,
    category_id: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: UpdateCategoryPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": format!("Invalid request body: {}", e)}).to_string(),
            )
        }
    };

    match update_category(client, table_name, category_id, payload).await {
        Ok(category) => json_response(StatusCode::OK, serde_json::to_string(&category)?),
        Err(e) => json_response(error_status(&e), serde_json::json!({"error": e}).to_string()),
    }
}

/// HTTP Handler: DELETE /categories/{id}
pub async fn delete_category_handler(
    client: &DynamoClient,
    table_name: &str,
    category_id: &str,
) -> Result<Response<Body>, LambdaError> {
    match delete_category(client, table_name, category_id).await {
        Ok(_) => Ok(Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header("Access-Control-Allow-Origin", "*")
            .body(Body::Empty)
            .map_err(Box::new)?),
        Err(e) => json_response(error_status(&e), serde_json::json!({"error": e}).to_string()),
    }
}
