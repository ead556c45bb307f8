use aws_sdk_cognitoidentityprovider::types::{AttributeType, AuthFlowType};
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use base64::Engine;
use hmac::{Hmac, Mac};
use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Deserialize;
use sha2::Sha256;

pub const ACCESS_TOKEN_COOKIE: &str = "blockhall_access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "blockhall_refresh_token";
pub const USERNAME_COOKIE: &str = "blockhall_username";

const ALLOWED_ORIGINS: [&str; 4] = [
    "https://blockhall.app",
    "https://www.blockhall.app",
    "http://localhost:5173",
    "http://localhost:3000",
];

/// Validated caller identity plus any cookies minted during auto-refresh.
pub struct AuthContext {
    pub user_id: String,
    pub email: String,
    pub is_admin: bool,
    pub set_cookies: Vec<String>,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct SignupRequest {
    username: String,
    email: String,
    password: String,
}

/// Echo the request origin back when it is on the allowlist; otherwise fall
/// back to the production origin.
pub fn get_cors_origin(request_origin: Option<&str>) -> String {
    match request_origin {
        Some(origin) if ALLOWED_ORIGINS.contains(&origin) => origin.to_string(),
        _ => ALLOWED_ORIGINS[0].to_string(),
    }
}

/// Cognito SECRET_HASH: Base64(HMAC-SHA256(client_secret, username + client_id))
pub fn secret_hash(username: &str, client_id: &str, client_secret: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(client_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(username.as_bytes());
    mac.update(client_id.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Find a cookie value in a Cookie request header.
pub fn parse_cookie(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key == name && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

pub fn build_cookie(name: &str, value: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; Secure; SameSite=None",
        name, value, max_age_secs
    )
}

pub fn clear_cookie(name: &str) -> String {
    format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; Secure; SameSite=None",
        name
    )
}

fn json_response(status: StatusCode, body: String) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(body.into())
        .map_err(Box::new)?)
}

fn unauthorized(message: &str) -> Response<Body> {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header("Content-Type", "application/json")
        .body(serde_json::json!({"error": message}).to_string().into())
        .expect("static response")
}

/// 403 for authenticated callers without the admin role.
pub fn forbidden() -> Response<Body> {
    Response::builder()
        .status(StatusCode::FORBIDDEN)
        .header("Content-Type", "application/json")
        .body(
            serde_json::json!({"error": "Admin access required"})
                .to_string()
                .into(),
        )
        .expect("static response")
}

struct TokenIdentity {
    user_id: String,
    email: String,
    is_admin: bool,
}

/// Pull identity and role out of a validated access token.
/// The role comes from the `custom:role` attribute, never from the email.
async fn identity_from_token(
    cognito_client: &CognitoClient,
    access_token: &str,
) -> Result<TokenIdentity, String> {
    let result = cognito_client
        .get_user()
        .access_token(access_token)
        .send()
        .await
        .map_err(|e| format!("Cognito get_user error: {}", e))?;

    let mut user_id = String::new();
    let mut email = String::new();
    let mut is_admin = false;

    for attr in result.user_attributes() {
        match attr.name() {
            "sub" => user_id = attr.value().unwrap_or_default().to_string(),
            "email" => email = attr.value().unwrap_or_default().to_string(),
            "custom:role" => is_admin = attr.value() == Some("admin"),
            _ => {}
        }
    }

    if user_id.is_empty() {
        return Err("Access token carries no subject".to_string());
    }

    Ok(TokenIdentity {
        user_id,
        email,
        is_admin,
    })
}

/// POST /login - password auth against Cognito, tokens delivered as
/// HttpOnly cookies.
pub async fn login(
    cognito_client: &CognitoClient,
    client_id: &str,
    client_secret: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: LoginRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": format!("Invalid request body: {}", e)}).to_string(),
            )
        }
    };

    let result = cognito_client
        .initiate_auth()
        .auth_flow(AuthFlowType::UserPasswordAuth)
        .client_id(client_id)
        .auth_parameters("USERNAME", &req.email)
        .auth_parameters("PASSWORD", &req.password)
        .auth_parameters(
            "SECRET_HASH",
            secret_hash(&req.email, client_id, client_secret),
        )
        .send()
        .await;

    let auth = match result {
        Ok(output) => match output.authentication_result {
            Some(auth) => auth,
            None => {
                tracing::warn!("Login challenge flow not supported for {}", req.email);
                return Ok(unauthorized("Login failed"));
            }
        },
        Err(e) => {
            tracing::warn!("Login failed for {}: {}", req.email, e);
            return Ok(unauthorized("Invalid credentials"));
        }
    };

    let access_token = auth.access_token().unwrap_or_default().to_string();
    let expires_in = auth.expires_in() as i64;

    let identity = match identity_from_token(cognito_client, &access_token).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::error!("Failed to read identity after login: {}", e);
            return Ok(unauthorized("Login failed"));
        }
    };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header(
            "Set-Cookie",
            build_cookie(ACCESS_TOKEN_COOKIE, &access_token, expires_in),
        )
        .header(
            "Set-Cookie",
            build_cookie(USERNAME_COOKIE, &identity.user_id, 30 * 24 * 3600),
        );

    if let Some(refresh) = auth.refresh_token() {
        builder = builder.header(
            "Set-Cookie",
            build_cookie(REFRESH_TOKEN_COOKIE, refresh, 30 * 24 * 3600),
        );
    }

    Ok(builder
        .body(
            serde_json::json!({
                "user": {
                    "id": identity.user_id,
                    "email": identity.email,
                    "username": identity.email.split('@').next().unwrap_or("User"),
                    "is_admin": identity.is_admin,
                }
            })
            .to_string()
            .into(),
        )
        .map_err(Box::new)?)
}

/// POST /signup - create the Cognito user plus the profile row.
/// New accounts always start with the non-admin role.
pub async fn signup(
    cognito_client: &CognitoClient,
    dynamo_client: &DynamoClient,
    table_name: &str,
    client_id: &str,
    client_secret: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: SignupRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": format!("Invalid request body: {}", e)}).to_string(),
            )
        }
    };

    if req.username.trim().is_empty() || !req.email.contains('@') || req.password.len() < 8 {
        return json_response(
            StatusCode::BAD_REQUEST,
            serde_json::json!({"error": "Username, valid email and a password of at least 8 characters are required"})
                .to_string(),
        );
    }

    let result = cognito_client
        .sign_up()
        .client_id(client_id)
        .secret_hash(secret_hash(&req.email, client_id, client_secret))
        .username(&req.email)
        .password(&req.password)
        .user_attributes(
            AttributeType::builder()
                .name("email")
                .value(&req.email)
                .build()?,
        )
        .user_attributes(
            AttributeType::builder()
                .name("preferred_username")
                .value(&req.username)
                .build()?,
        )
        .user_attributes(
            AttributeType::builder()
                .name("custom:role")
                .value("user")
                .build()?,
        )
        .send()
        .await;

    let user_sub = match result {
        Ok(output) => output.user_sub().to_string(),
        Err(e) => {
            tracing::warn!("Signup failed for {}: {}", req.email, e);
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": "Signup failed"}).to_string(),
            );
        }
    };

    // Profile row; the auth account is authoritative, this is display data
    let now = chrono::Utc::now().to_rfc3339();
    let pk = format!("USER#{}", user_sub);
    if let Err(e) = dynamo_client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(pk.clone()))
        .item("SK", AttributeValue::S(pk))
        .item("username", AttributeValue::S(req.username.clone()))
        .item("email", AttributeValue::S(req.email.clone()))
        .item("is_admin", AttributeValue::Bool(false))
        .item("created_at", AttributeValue::S(now))
        .send()
        .await
    {
        tracing::error!("Failed to write profile row for {}: {}", user_sub, e);
    }

    json_response(
        StatusCode::CREATED,
        serde_json::json!({"message": "ok", "user_id": user_sub}).to_string(),
    )
}

/// POST /refresh - mint a new access token from the refresh cookie.
pub async fn refresh_token(
    cognito_client: &CognitoClient,
    client_id: &str,
    client_secret: &str,
    cookie_header: Option<&str>,
) -> Result<Response<Body>, Error> {
    let cookies = cookie_header.unwrap_or("");
    let refresh = parse_cookie(cookies, REFRESH_TOKEN_COOKIE);
    let username = parse_cookie(cookies, USERNAME_COOKIE);

    let (Some(refresh), Some(username)) = (refresh, username) else {
        return Ok(unauthorized("No refresh token"));
    };

    match mint_access_token(cognito_client, client_id, client_secret, &refresh, &username).await {
        Ok((access_token, expires_in)) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .header(
                "Set-Cookie",
                build_cookie(ACCESS_TOKEN_COOKIE, &access_token, expires_in),
            )
            .body(serde_json::json!({"message": "ok"}).to_string().into())
            .map_err(Box::new)?),
        Err(e) => {
            tracing::warn!("Token refresh failed: {}", e);
            Ok(unauthorized("Refresh failed"))
        }
    }
}

async fn mint_access_token(
    cognito_client: &CognitoClient,
    client_id: &str,
    client_secret: &str,
    refresh: &str,
    username: &str,
) -> Result<(String, i64), String> {
    let output = cognito_client
        .initiate_auth()
        .auth_flow(AuthFlowType::RefreshTokenAuth)
        .client_id(client_id)
        .auth_parameters("REFRESH_TOKEN", refresh)
        .auth_parameters(
            "SECRET_HASH",
            secret_hash(username, client_id, client_secret),
        )
        .send()
        .await
        .map_err(|e| format!("Cognito initiate_auth error: {}", e))?;

    let auth = output
        .authentication_result
        .ok_or_else(|| "No authentication result".to_string())?;

    let access_token = auth
        .access_token()
        .ok_or_else(|| "No access token".to_string())?
        .to_string();

    Ok((access_token, auth.expires_in() as i64))
}

/// Validate the access-token cookie, auto-refreshing once when it has
/// expired. On failure the caller gets a ready-made 401 response.
pub async fn authenticate_cookie_request(
    cognito_client: &CognitoClient,
    client_id: &str,
    client_secret: &str,
    cookie_header: Option<&str>,
) -> Result<AuthContext, Response<Body>> {
    let cookies = cookie_header.unwrap_or("");

    if let Some(access_token) = parse_cookie(cookies, ACCESS_TOKEN_COOKIE) {
        if let Ok(identity) = identity_from_token(cognito_client, &access_token).await {
            return Ok(AuthContext {
                user_id: identity.user_id,
                email: identity.email,
                is_admin: identity.is_admin,
                set_cookies: vec![],
            });
        }
    }

    // Expired or missing access token: try the refresh path once
    let refresh = parse_cookie(cookies, REFRESH_TOKEN_COOKIE);
    let username = parse_cookie(cookies, USERNAME_COOKIE);

    let (Some(refresh), Some(username)) = (refresh, username) else {
        return Err(unauthorized("Not authenticated"));
    };

    let (access_token, expires_in) =
        match mint_access_token(cognito_client, client_id, client_secret, &refresh, &username)
            .await
        {
            Ok(minted) => minted,
            Err(e) => {
                tracing::warn!("Session refresh failed: {}", e);
                return Err(unauthorized("Session expired"));
            }
        };

    match identity_from_token(cognito_client, &access_token).await {
        Ok(identity) => Ok(AuthContext {
            user_id: identity.user_id,
            email: identity.email,
            is_admin: identity.is_admin,
            set_cookies: vec![build_cookie(ACCESS_TOKEN_COOKIE, &access_token, expires_in)],
        }),
        Err(e) => {
            tracing::warn!("Refreshed token rejected: {}", e);
            Err(unauthorized("Session expired"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cookies_out_of_the_header() {
        let header = "foo=1; blockhall_access_token=abc.def; blockhall_username=u-1";
        assert_eq!(
            parse_cookie(header, ACCESS_TOKEN_COOKIE).as_deref(),
            Some("abc.def")
        );
        assert_eq!(
            parse_cookie(header, USERNAME_COOKIE).as_deref(),
            Some("u-1")
        );
        assert_eq!(parse_cookie(header, REFRESH_TOKEN_COOKIE), None);
        assert_eq!(parse_cookie("blockhall_access_token=", ACCESS_TOKEN_COOKIE), None);
    }

    #[test]
    fn cors_origin_falls_back_to_production() {
        assert_eq!(
            get_cors_origin(Some("http://localhost:5173")),
            "http://localhost:5173"
        );
        assert_eq!(
            get_cors_origin(Some("https://evil.example.com")),
            "https://blockhall.app"
        );
        assert_eq!(get_cors_origin(None), "https://blockhall.app");
    }

    #[test]
    fn secret_hash_is_deterministic_and_input_sensitive() {
        let a = secret_hash("user@example.com", "client", "secret");
        let b = secret_hash("user@example.com", "client", "secret");
        let c = secret_hash("other@example.com", "client", "secret");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(base64::engine::general_purpose::STANDARD.decode(&a).is_ok());
    }

    #[test]
    fn cookies_are_http_only_and_expirable() {
        let cookie = build_cookie(ACCESS_TOKEN_COOKIE, "tok", 3600);
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(clear_cookie(ACCESS_TOKEN_COOKIE).contains("Max-Age=0"));
    }
}
