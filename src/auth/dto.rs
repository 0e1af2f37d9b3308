use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::directory::model::{Role, User};

#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
}

/// Open registration; `role` defaults to customer and may not be admin.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Customer self-registration gated by an emailed code.
#[derive(Debug, Deserialize)]
pub struct RegisterCustomerRequest {
    pub email: String,
    pub password: String,
    pub passport: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Returned by register, login and refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            role: u.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CodeSent {
    pub message: &'static str,
}
