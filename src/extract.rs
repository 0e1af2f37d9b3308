//! Request-body extraction that answers with [`AppError`] instead of axum's
//! plain-text rejections.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppError;

/// JSON request body; malformed or mistyped bodies become `Validation`.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected(rejection)),
        }
    }
}

fn rejected(rejection: JsonRejection) -> AppError {
    debug!(status = %rejection.status(), "json body rejected");
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => "Expected a JSON body".to_string(),
        other => other.body_text(),
    };
    AppError::Validation(message)
}
