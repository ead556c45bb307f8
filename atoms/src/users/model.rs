use serde::{Deserialize, Serialize};

/// User profile row, keyed by the Cognito user id.
/// `is_admin` mirrors the role claim carried by the auth provider; it is
/// never writable through the profile API.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: String,
    pub last_login: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserPayload {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserPayload {
    pub username: Option<String>,
}
