use aws_lambda_events::event::apigw::{
    ApiGatewayProxyResponse, ApiGatewayWebsocketProxyRequest,
};
use aws_sdk_dynamodb::Client as DynamoClient;
use blockhall_shared::sockets;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::env;

/// WebSocket lifecycle handler.
///
/// `$connect` and `$disconnect` maintain the connection registry; any other
/// route is treated as a client message and fanned out to every registered
/// connection.
async fn function_handler(
    event: LambdaEvent<ApiGatewayWebsocketProxyRequest>,
    dynamo_client: &DynamoClient,
) -> Result<ApiGatewayProxyResponse, Error> {
    let table_name = env::var("TABLE_NAME").unwrap_or_else(|_| "blockhall".to_string());
    let context = &event.payload.request_context;

    let route_key = context.route_key.as_deref().unwrap_or_default();
    let connection_id = context
        .connection_id
        .as_deref()
        .ok_or("Missing connection id")?;

    tracing::info!("WebSocket event - Route: {} Conn: {}", route_key, connection_id);

    match route_key {
        "$connect" => {
            sockets::register_connection(dynamo_client, &table_name, connection_id).await?;
        }
        "$disconnect" => {
            sockets::remove_connection(dynamo_client, &table_name, connection_id).await?;
        }
        _ => {
            let body = event.payload.body.as_deref().unwrap_or("");
            let message: sockets::WebSocketMessage = match serde_json::from_str(body) {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!("Ignoring malformed message from {}: {}", connection_id, e);
                    return Ok(ok_response());
                }
            };

            let domain = context.domain_name.as_deref().ok_or("Missing domain name")?;
            let stage = context.stage.as_deref().ok_or("Missing stage")?;
            let endpoint = format!("https://{}/{}", domain, stage);

            let broadcast = sockets::BroadcastMessage::new(&message.action, message.data);
            let api_client = sockets::management_client(&endpoint).await;
            let delivered =
                sockets::broadcast_all(dynamo_client, &api_client, &table_name, &broadcast).await?;
            tracing::info!("Relayed {} to {} connections", broadcast.r#type, delivered);
        }
    }

    Ok(ok_response())
}

fn ok_response() -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code: 200,
        ..Default::default()
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let config = aws_config::load_from_env().await;
    let dynamo_client = DynamoClient::new(&config);

    run(service_fn(|event| async {
        function_handler(event, &dynamo_client).await
    }))
    .await
}
