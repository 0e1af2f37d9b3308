use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::claims::TokenKind;
use super::jwt::JwtKeys;
use crate::directory::model::{Role, User};
use crate::error::AppError;
use crate::state::AppState;

/// User id named by a valid access token. No directory lookup.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Unauthorized("Invalid or expired token".into())
        })?;

        if claims.kind != TokenKind::Access {
            return Err(AppError::Unauthorized("Access token required".into()));
        }

        Ok(AuthUser(claims.sub))
    }
}

/// The authenticated user, reloaded from the directory on every request so a
/// deleted account or changed role takes effect immediately.
#[derive(Debug, Clone)]
pub struct Principal(pub User);

impl Principal {
    /// Fails with `Forbidden` unless the user holds one of `roles`.
    pub fn require(&self, roles: &[Role]) -> Result<&User, AppError> {
        if roles.contains(&self.0.role) {
            Ok(&self.0)
        } else {
            debug!(user_id = %self.0.id, role = ?self.0.role, ?roles, "role check failed");
            Err(AppError::Forbidden("Access denied".into()))
        }
    }

    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;
        let user = state
            .directory
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
        Ok(Principal(user))
    }
}
