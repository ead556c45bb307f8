use blockhall_atoms as atoms;
use blockhall_shared::{auth, sockets, AppState};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, RequestExt, Response,
};
use showcase_block::http as showcase;
use std::env;
use std::sync::Arc;

use lambda_http::http::header::{HeaderValue, SET_COOKIE, VARY};

fn with_set_cookies(mut resp: Response<Body>, cookies: &[String]) -> Response<Body> {
    let headers = resp.headers_mut();
    for cookie in cookies {
        if let Ok(v) = HeaderValue::from_str(cookie) {
            headers.append(SET_COOKIE, v);
        }
    }
    resp
}

fn with_cors_headers(mut resp: Response<Body>, request_origin: Option<&str>) -> Response<Body> {
    let cors_origin = auth::get_cors_origin(request_origin);

    let headers = resp.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_str(&cors_origin)
            .unwrap_or_else(|_| HeaderValue::from_static("https://blockhall.app")),
    );
    headers.insert(
        "Access-Control-Allow-Credentials",
        HeaderValue::from_static("true"),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,PUT,PATCH,DELETE,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type,Authorization,Cookie"),
    );
    headers.append(VARY, HeaderValue::from_static("Origin"));

    resp
}

fn finalize_response(
    resp: Result<Response<Body>, Error>,
    request_origin: Option<&str>,
    cookies: &[String],
) -> Result<Response<Body>, Error> {
    resp.map(|r| with_cors_headers(with_set_cookies(r, cookies), request_origin))
}

fn method_not_allowed() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "application/json")
        .body(
            serde_json::json!({"error": "Method not allowed"})
                .to_string()
                .into(),
        )
        .map_err(Box::new)?)
}

fn not_found() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .body(serde_json::json!({"error": "Not found"}).to_string().into())
        .map_err(Box::new)?)
}

/// Publish the current achievement list to every WebSocket client.
///
/// Broadcast failures are logged but never fail the confirm request; clients
/// fall back to their regular polling.
async fn broadcast_achievements(state: &AppState, table_name: &str) -> Result<usize, String> {
    let endpoint = match env::var("WEBSOCKET_ENDPOINT") {
        Ok(e) if !e.is_empty() => e,
        _ => {
            tracing::warn!("WEBSOCKET_ENDPOINT not set, skipping broadcast");
            return Ok(0);
        }
    };

    let achievements =
        atoms::achievements::service::list_achievements(&state.dynamo_client, table_name).await?;

    let message = sockets::BroadcastMessage::new(
        sockets::ACHIEVEMENTS_UPDATED,
        serde_json::json!({ "achievements": achievements }),
    );

    let api_client = sockets::management_client(&endpoint).await;
    sockets::broadcast_all(&state.dynamo_client, &api_client, table_name, &message).await
}

/// Main Lambda handler - routes requests to public, auth or admin endpoints
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();
    let request_origin = event.headers().get("Origin").and_then(|v| v.to_str().ok());
    tracing::info!("API invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == "OPTIONS" {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Body::Empty)
            .map_err(Box::new)?;
        return Ok(with_cors_headers(resp, request_origin));
    }

    let table_name = env::var("TABLE_NAME").unwrap_or_else(|_| "blockhall".to_string());
    let bucket_name =
        env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "blockhall-images".to_string());

    // Auth endpoints (no cookie validation)
    if path.starts_with("/login") {
        let client_id = env::var("COGNITO_CLIENT_ID").expect("COGNITO_CLIENT_ID must be set");
        let client_secret =
            env::var("COGNITO_CLIENT_SECRET").expect("COGNITO_CLIENT_SECRET must be set");

        return match method {
            &Method::POST => finalize_response(
                auth::login(&state.cognito_client, &client_id, &client_secret, body).await,
                request_origin,
                &[],
            ),
            _ => finalize_response(method_not_allowed(), request_origin, &[]),
        };
    }

    if path.starts_with("/signup") {
        let client_id = env::var("COGNITO_CLIENT_ID").expect("COGNITO_CLIENT_ID must be set");
        let client_secret =
            env::var("COGNITO_CLIENT_SECRET").expect("COGNITO_CLIENT_SECRET must be set");

        return match method {
            &Method::POST => finalize_response(
                auth::signup(
                    &state.cognito_client,
                    &state.dynamo_client,
                    &table_name,
                    &client_id,
                    &client_secret,
                    body,
                )
                .await,
                request_origin,
                &[],
            ),
            _ => finalize_response(method_not_allowed(), request_origin, &[]),
        };
    }

    if path.starts_with("/refresh") {
        let client_id = env::var("COGNITO_CLIENT_ID").expect("COGNITO_CLIENT_ID must be set");
        let client_secret =
            env::var("COGNITO_CLIENT_SECRET").expect("COGNITO_CLIENT_SECRET must be set");
        let cookie_header = event.headers().get("Cookie").and_then(|v| v.to_str().ok());

        return match method {
            &Method::POST => finalize_response(
                auth::refresh_token(&state.cognito_client, &client_id, &client_secret, cookie_header)
                    .await,
                request_origin,
                &[],
            ),
            _ => finalize_response(method_not_allowed(), request_origin, &[]),
        };
    }

    if path.starts_with("/logout") {
        return match method {
            &Method::POST => {
                let resp = Response::builder()
                    .status(StatusCode::OK)
                    .header("Content-Type", "application/json")
                    .header("Set-Cookie", auth::clear_cookie(auth::ACCESS_TOKEN_COOKIE))
                    .header("Set-Cookie", auth::clear_cookie(auth::REFRESH_TOKEN_COOKIE))
                    .header("Set-Cookie", auth::clear_cookie(auth::USERNAME_COOKIE))
                    .body(serde_json::json!({"message": "ok"}).to_string().into())
                    .map_err(Box::new)?;
                finalize_response(Ok(resp), request_origin, &[])
            }
            _ => finalize_response(method_not_allowed(), request_origin, &[]),
        };
    }

    // User endpoints (cookie auth, no admin requirement)
    if path.starts_with("/users") {
        let client_id = env::var("COGNITO_CLIENT_ID").expect("COGNITO_CLIENT_ID must be set");
        let client_secret =
            env::var("COGNITO_CLIENT_SECRET").expect("COGNITO_CLIENT_SECRET must be set");
        let cookie_header = event.headers().get("Cookie").and_then(|v| v.to_str().ok());

        let auth_ctx = match auth::authenticate_cookie_request(
            &state.cognito_client,
            &client_id,
            &client_secret,
            cookie_header,
        )
        .await
        {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(with_cors_headers(resp, request_origin)),
        };

        let resp = match (method, path) {
            (&Method::POST, "/users") => {
                atoms::users::create_user(
                    &state.dynamo_client,
                    &table_name,
                    &auth_ctx.user_id,
                    auth_ctx.is_admin,
                    body,
                )
                .await
            }
            (&Method::GET, "/users/me") => {
                atoms::users::get_user(
                    &state.dynamo_client,
                    &table_name,
                    &auth_ctx.user_id,
                    auth_ctx.is_admin,
                )
                .await
            }
            (&Method::PATCH, "/users/me") => {
                atoms::users::update_user(
                    &state.dynamo_client,
                    &table_name,
                    &auth_ctx.user_id,
                    auth_ctx.is_admin,
                    body,
                )
                .await
            }
            _ => not_found(),
        };

        return finalize_response(resp, request_origin, &auth_ctx.set_cookies);
    }

    // Public read endpoints (no auth)
    if method == &Method::GET {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let resp = match parts.as_slice() {
            ["achievements"] => {
                let params = event.query_string_parameters();
                let filter = showcase::filter_from_params(
                    params.first("category"),
                    params.first("search"),
                    params.first("unlocked"),
                );
                return finalize_response(
                    showcase::list_showcase_handler(&state.dynamo_client, &table_name, filter)
                        .await,
                    request_origin,
                    &[],
                );
            }
            ["achievements", achievement_id] => {
                atoms::achievements::get_achievement_handler(
                    &state.dynamo_client,
                    &table_name,
                    achievement_id,
                )
                .await
            }
            ["categories"] => {
                atoms::categories::list_categories_handler(&state.dynamo_client, &table_name).await
            }
            ["rarities"] => atoms::achievements::list_rarities_handler().await,
            ["gallery"] => {
                atoms::gallery::list_gallery_images_handler(&state.dynamo_client, &table_name).await
            }
            _ => not_found(),
        };

        return finalize_response(resp, request_origin, &[]);
    }

    // All remaining routes are admin mutations (cookie auth + role check)
    let client_id = env::var("COGNITO_CLIENT_ID").expect("COGNITO_CLIENT_ID must be set");
    let client_secret =
        env::var("COGNITO_CLIENT_SECRET").expect("COGNITO_CLIENT_SECRET must be set");
    let cookie_header = event.headers().get("Cookie").and_then(|v| v.to_str().ok());

    let auth_ctx = match auth::authenticate_cookie_request(
        &state.cognito_client,
        &client_id,
        &client_secret,
        cookie_header,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(with_cors_headers(resp, request_origin)),
    };

    if !auth_ctx.is_admin {
        tracing::warn!("Non-admin {} attempted {} {}", auth_ctx.user_id, method, path);
        return finalize_response(
            Ok(auth::forbidden()),
            request_origin,
            &auth_ctx.set_cookies,
        );
    }

    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let resp = match (method, parts.as_slice()) {
        // --- ACHIEVEMENTS ---
        (&Method::POST, ["achievements"]) => {
            atoms::achievements::create_achievement_handler(
                &state.dynamo_client,
                &state.s3_client,
                &table_name,
                &bucket_name,
                body,
            )
            .await
        }
        // POST /achievements/confirm - publish pending edits to all clients
        (&Method::POST, ["achievements", "confirm"]) => {
            match broadcast_achievements(&state, &table_name).await {
                Ok(delivered) => Ok(Response::builder()
                    .status(StatusCode::OK)
                    .header("Content-Type", "application/json")
                    .body(
                        serde_json::json!({
                            "message": "Changes published",
                            "delivered": delivered,
                        })
                        .to_string()
                        .into(),
                    )
                    .map_err(Box::new)?),
                Err(e) => {
                    tracing::error!("Failed to broadcast confirmed changes: {}", e);
                    Ok(Response::builder()
                        .status(StatusCode::INTERNAL_SERVER_ERROR)
                        .header("Content-Type", "application/json")
                        .body(serde_json::json!({"error": e}).to_string().into())
                        .map_err(Box::new)?)
                }
            }
        }
        (&Method::PATCH, ["achievements", achievement_id]) => {
            atoms::achievements::update_achievement_handler(
                &state.dynamo_client,
                &state.s3_client,
                &table_name,
                &bucket_name,
                achievement_id,
                body,
            )
            .await
        }
        (&Method::DELETE, ["achievements", achievement_id]) => {
            atoms::achievements::delete_achievement_handler(
                &state.dynamo_client,
                &state.s3_client,
                &table_name,
                &bucket_name,
                achievement_id,
            )
            .await
        }
        // PUT /achievements/{id}/image - replace the card image
        (&Method::PUT, ["achievements", achievement_id, "image"]) => {
            atoms::achievements::set_achievement_image_handler(
                &state.dynamo_client,
                &state.s3_client,
                &table_name,
                &bucket_name,
                achievement_id,
                body,
            )
            .await
        }

        // --- CATEGORIES ---
        (&Method::POST, ["categories"]) => {
            atoms::categories::create_category_handler(&state.dynamo_client, &table_name, body)
                .await
        }
        (&Method::PATCH, ["categories", category_id]) => {
            atoms::categories::update_category_handler(
                &state.dynamo_client,
                &table_name,
                category_id,
                body,
            )
            .await
        }
        (&Method::DELETE, ["categories", category_id]) => {
            atoms::categories::delete_category_handler(
                &state.dynamo_client,
                &table_name,
                category_id,
            )
            .await
        }

        // --- GALLERY ---
        (&Method::POST, ["gallery"]) => {
            atoms::gallery::create_gallery_image_handler(
                &state.dynamo_client,
                &state.s3_client,
                &table_name,
                &bucket_name,
                body,
            )
            .await
        }
        (&Method::DELETE, ["gallery", image_id]) => {
            atoms::gallery::delete_gallery_image_handler(
                &state.dynamo_client,
                &state.s3_client,
                &table_name,
                &bucket_name,
                image_id,
            )
            .await
        }

        _ => {
            tracing::warn!("No route matched - Method: {} Path: {}", method, path);
            not_found()
        }
    };

    finalize_response(resp, request_origin, &auth_ctx.set_cookies)
}
