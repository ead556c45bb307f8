use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::{
    ensure_not_reserved, Category, CreateCategoryPayload, UpdateCategoryPayload, ALL_CATEGORY_ID,
};

/// List all categories. The reserved "all" pseudo-category is prepended so
/// the gallery always has a no-filter entry.
pub async fn list_categories(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Vec<Category>, String> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S("CATEGORY".to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("CATEGORY#".to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB query error: {}", e))?;

    let mut categories = vec![Category {
        id: ALL_CATEGORY_ID.to_string(),
        name: "All".to_string(),
    }];

    for item in result.items() {
        if let Some(sk) = item.get("SK").and_then(|v| v.as_s().ok()) {
            if let Some(category_id) = sk.strip_prefix("CATEGORY#") {
                categories.push(Category {
                    id: category_id.to_string(),
                    name: item
                        .get("name")
                        .and_then(|v| v.as_s().ok())
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                });
            }
        }
    }

    Ok(categories)
}

/// Get a specific category
pub async fn get_category(
    client: &DynamoClient,
    table_name: &str,
    category_id: &str,
) -> Result<Category, String> {
    let sk = format!("CATEGORY#{}", category_id);

    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("CATEGORY".to_string()))
        .key("SK", AttributeValue::S(sk))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    if let Some(item) = result.item() {
        Ok(Category {
            id: category_id.to_string(),
            name: item
                .get("name")
                .and_then(|v| v.as_s().ok())
                .map(|s| s.to_string())
                .unwrap_or_default(),
        })
    } else {
        Err("Category not found".to_string())
    }
}

/// Create a new category. The "all" id is rejected.
pub async fn create_category(
    client: &DynamoClient,
    table_name: &str,
    payload: CreateCategoryPayload,
) -> Result<Category, String> {
    if payload.name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    let category_id = match payload.id {
        Some(id) if !id.trim().is_empty() => id,
        _ => uuid::Uuid::new_v4().to_string(),
    };
    ensure_not_reserved(&category_id)?;

    let sk = format!("CATEGORY#{}", category_id);

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S("CATEGORY".to_string()))
        .item("SK", AttributeValue::S(sk))
        .item("name", AttributeValue::S(payload.name.clone()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB put_item error: {}", e))?;

    Ok(Category {
        id: category_id,
        name: payload.name,
    })
}

/// Update a category display name
pub async fn update_category(
    client: &DynamoClient,
    table_name: &str,
    category_id: &str,
    payload: UpdateCategoryPayload,
) -> Result<Category, String> {
    ensure_not_reserved(category_id)?;

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err("Name is required".to_string());
        }

        let sk = format!("CATEGORY#{}", category_id);

        client
            .update_item()
            .table_name(table_name)
            .key("PK", AttributeValue::S("CATEGORY".to_string()))
            .key("SK", AttributeValue::S(sk))
            .update_expression("SET #name = :name")
            .expression_attribute_names("#name", "name")
            .expression_attribute_values(":name", AttributeValue::S(name))
            .send()
            .await
            .map_err(|e| format!("DynamoDB update_item error: {}", e))?;
    }

    get_category(client, table_name, category_id).await
}

/// Delete a category. The reserved "all" pseudo-category cannot be removed.
pub async fn delete_category(
    client: &DynamoClient,
    table_name: &str,
    category_id: &str,
) -> Result<(), String> {
    ensure_not_reserved(category_id)?;

    let sk = format!("CATEGORY#{}", category_id);

    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("CATEGORY".to_string()))
        .key("SK", AttributeValue::S(sk))
        .send()
        .await
        .map_err(|e| format!("DynamoDB delete_item error: {}", e))?;

    Ok(())
}
