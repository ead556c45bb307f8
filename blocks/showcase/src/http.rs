use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use crate::filters::{filter_achievements, ShowcaseFilter};
use blockhall_atoms::achievements::service::list_achievements;

/// HTTP Handler: GET /achievements
///
/// Lists the gallery, applying category / search / unlock-state filters from
/// the query string.
pub async fn list_showcase_handler(
    client: &DynamoClient,
    table_name: &str,
    filter: ShowcaseFilter,
) -> Result<Response<Body>, Error> {
    match list_achievements(client, table_name).await {
        Ok(achievements) => {
            let visible = if filter.is_empty() {
                achievements
            } else {
                filter_achievements(&achievements, &filter)
            };

            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(serde_json::to_string(&visible)?.into())
                .map_err(Box::new)?)
        }
        Err(e) => {
            tracing::error!("Failed to list achievements: {}", e);
            Ok(Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(serde_json::json!({"error": e}).to_string().into())
                .map_err(Box::new)?)
        }
    }
}

/// Build a `ShowcaseFilter` from query-string parameters.
pub fn filter_from_params(
    category: Option<&str>,
    search: Option<&str>,
    unlocked: Option<&str>,
) -> ShowcaseFilter {
    ShowcaseFilter {
        category: category.map(|c| c.to_string()),
        search: search.filter(|s| !s.is_empty()).map(|s| s.to_string()),
        unlocked: unlocked.and_then(|u| u.parse().ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_filter_from_query_params() {
        let filter = filter_from_params(Some("redstone"), Some("farm"), Some("true"));
        assert_eq!(filter.category.as_deref(), Some("redstone"));
        assert_eq!(filter.search.as_deref(), Some("farm"));
        assert_eq!(filter.unlocked, Some(true));

        let empty = filter_from_params(None, Some(""), Some("maybe"));
        assert!(empty.search.is_none());
        assert!(empty.unlocked.is_none());
        assert!(empty.is_empty());
    }
}
