use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{Body, Error, Response};

use super::model::{CreateUserPayload, UpdateUserPayload, User};

/// Create the profile row after Cognito signup.
/// `is_admin` comes from the validated role claim, never from the payload.
pub async fn create_user(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    is_admin: bool,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: CreateUserPayload = serde_json::from_slice(body)?;

    let now = chrono::Utc::now().to_rfc3339();
    let pk = format!("USER#{}", user_id);

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(pk.clone()))
        .item("SK", AttributeValue::S(pk))
        .item("username", AttributeValue::S(req.username.clone()))
        .item("email", AttributeValue::S(req.email.clone()))
        .item("is_admin", AttributeValue::Bool(is_admin))
        .item("created_at", AttributeValue::S(now.clone()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB put_item error: {}", e))?;

    let user = User {
        user_id: user_id.to_string(),
        username: req.username,
        email: req.email,
        is_admin,
        created_at: now,
        last_login: None,
    };

    let resp = Response::builder()
        .status(201)
        .header("content-type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&user)?.into())
        .map_err(Box::new)?;
    Ok(resp)
}

/// Get the current user's profile
pub async fn get_user(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    is_admin: bool,
) -> Result<Response<Body>, Error> {
    let pk = format!("USER#{}", user_id);

    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk.clone()))
        .key("SK", AttributeValue::S(pk.clone()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    if let Some(item) = result.item() {
        let email = item
            .get("email")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();
        let mut username = item
            .get("username")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();
        if username.trim().is_empty() {
            username = email.split('@').next().unwrap_or("User").to_string();
        }
        let created_at = item
            .get("created_at")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        // Update last_login on every get
        let now = chrono::Utc::now().to_rfc3339();
        let _ = client
            .update_item()
            .table_name(table_name)
            .key("PK", AttributeValue::S(pk.clone()))
            .key("SK", AttributeValue::S(pk))
            .update_expression("SET last_login = :login")
            .expression_attribute_values(":login", AttributeValue::S(now.clone()))
            .send()
            .await;

        let user = User {
            user_id: user_id.to_string(),
            username,
            email,
            is_admin,
            created_at,
            last_login: Some(now),
        };

        let resp = Response::builder()
            .status(200)
            .header("content-type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(serde_json::to_string(&user)?.into())
            .map_err(Box::new)?;
        Ok(resp)
    } else {
        let resp = Response::builder()
            .status(404)
            .header("content-type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(
                serde_json::json!({"error": "User not found"})
                    .to_string()
                    .into(),
            )
            .map_err(Box::new)?;
        Ok(resp)
    }
}

/// Update the current user's profile
pub async fn update_user(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    is_admin: bool,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: UpdateUserPayload = serde_json::from_slice(body)?;
    let pk = format!("USER#{}", user_id);

    if let Some(username) = req.username {
        client
            .update_item()
            .table_name(table_name)
            .key("PK", AttributeValue::S(pk.clone()))
            .key("SK", AttributeValue::S(pk))
            .update_expression("SET username = :username")
            .expression_attribute_values(":username", AttributeValue::S(username))
            .send()
            .await
            .map_err(|e| format!("DynamoDB update_item error: {}", e))?;
    }

    get_user(client, table_name, user_id, is_admin).await
}
