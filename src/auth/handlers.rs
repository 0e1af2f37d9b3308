use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{
    AuthResponse, CodeSent, LoginRequest, PublicUser, RefreshRequest, RegisterCustomerRequest,
    RegisterRequest, SendCodeRequest,
};
use super::extractors::Principal;
use super::jwt::JwtKeys;
use super::services;
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/send-verification-code", post(send_verification_code))
        .route("/auth/register", post(register))
        .route("/auth/registercustomer", post(register_customer))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/me", get(me))
}

#[instrument(skip(state, payload))]
pub async fn send_verification_code(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SendCodeRequest>,
) -> AppResult<Json<CodeSent>> {
    services::send_code(&state, &payload.email).await?;
    Ok(Json(CodeSent {
        message: "Verification code sent",
    }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let user = services::register(&state, &payload.email, &payload.password, payload.role).await?;
    let keys = JwtKeys::from_ref(&state);
    info!(user_id = %user.id, role = ?user.role, "user registered");
    Ok((StatusCode::CREATED, Json(services::issue_tokens(&keys, &user)?)))
}

#[instrument(skip(state, payload))]
pub async fn register_customer(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterCustomerRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let user = services::register_customer(
        &state,
        &payload.email,
        &payload.password,
        &payload.passport,
        &payload.code,
    )
    .await?;
    let keys = JwtKeys::from_ref(&state);
    Ok((StatusCode::CREATED, Json(services::issue_tokens(&keys, &user)?)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = services::login(&state, &payload.email, &payload.password).await?;
    let keys = JwtKeys::from_ref(&state);
    Ok(Json(services::issue_tokens(&keys, &user)?))
}

/// Trades a refresh token for a new pair; the account must still exist.
#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Unauthorized("Invalid refresh token".into())
    })?;
    let user = state
        .directory
        .find_user(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    Ok(Json(services::issue_tokens(&keys, &user)?))
}

#[instrument(skip(principal), fields(user_id = %principal.id()))]
pub async fn me(principal: Principal) -> Json<PublicUser> {
    Json(PublicUser::from(&principal.0))
}
