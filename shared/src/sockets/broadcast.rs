use aws_sdk_apigatewaymanagement::primitives::Blob;
use aws_sdk_apigatewaymanagement::Client as ApiGatewayClient;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use chrono::Utc;

use super::messages::BroadcastMessage;

/// Record a live WebSocket connection so later broadcasts can reach it.
pub async fn register_connection(
    client: &DynamoClient,
    table_name: &str,
    connection_id: &str,
) -> Result<(), String> {
    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S("CONN".to_string()))
        .item(
            "SK",
            AttributeValue::S(format!("CONN#{}", connection_id)),
        )
        .item(
            "connection_id",
            AttributeValue::S(connection_id.to_string()),
        )
        .item(
            "connected_at",
            AttributeValue::S(Utc::now().to_rfc3339()),
        )
        .send()
        .await
        .map_err(|e| format!("DynamoDB put connection error: {}", e))?;

    Ok(())
}

pub async fn remove_connection(
    client: &DynamoClient,
    table_name: &str,
    connection_id: &str,
) -> Result<(), String> {
    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("CONN".to_string()))
        .key(
            "SK",
            AttributeValue::S(format!("CONN#{}", connection_id)),
        )
        .send()
        .await
        .map_err(|e| format!("DynamoDB delete connection error: {}", e))?;

    Ok(())
}

pub async fn list_connections(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Vec<String>, String> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk)")
        .expression_attribute_values(":pk", AttributeValue::S("CONN".to_string()))
        .expression_attribute_values(":sk", AttributeValue::S("CONN#".to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB query connections error: {}", e))?;

    let connections = result
        .items()
        .iter()
        .filter_map(|item| {
            item.get("connection_id")
                .and_then(|v| v.as_s().ok())
                .map(|s| s.to_string())
        })
        .collect();

    Ok(connections)
}

/// Build a management client bound to the WebSocket stage endpoint.
pub async fn management_client(endpoint: &str) -> ApiGatewayClient {
    let config = aws_config::load_from_env().await;
    let api_config = aws_sdk_apigatewaymanagement::config::Builder::from(&config)
        .endpoint_url(endpoint)
        .build();
    ApiGatewayClient::from_conf(api_config)
}

/// Post a message to every registered connection. Connections the gateway no
/// longer knows about are pruned from the registry instead of failing the
/// whole broadcast.
pub async fn broadcast_all(
    dynamo_client: &DynamoClient,
    api_client: &ApiGatewayClient,
    table_name: &str,
    message: &BroadcastMessage,
) -> Result<usize, String> {
    let payload =
        serde_json::to_vec(message).map_err(|e| format!("Serialize broadcast error: {}", e))?;

    let connections = list_connections(dynamo_client, table_name).await?;
    let mut delivered = 0;

    for connection_id in connections {
        let result = api_client
            .post_to_connection()
            .connection_id(&connection_id)
            .data(Blob::new(payload.clone()))
            .send()
            .await;

        match result {
            Ok(_) => delivered += 1,
            Err(e) => {
                tracing::warn!("Dropping stale connection {}: {}", connection_id, e);
                if let Err(e) = remove_connection(dynamo_client, table_name, &connection_id).await {
                    tracing::warn!("Failed to prune connection {}: {}", connection_id, e);
                }
            }
        }
    }

    Ok(delivered)
}
