use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use super::model::{Baggage, BaggageSearch, BaggageTrace};
use super::services::{self, CheckIn};
use crate::auth::extractors::Principal;
use crate::directory::model::Role;
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::reservations::model::PaymentMethod;
use crate::reservations::services as reservations;
use crate::state::AppState;

pub fn baggage_routes() -> Router<AppState> {
    Router::new()
        .route("/baggage", get(list_for_reservation).post(check_in))
        .route("/baggage/all", get(search))
        .route("/baggage/:id", put(update_status))
        .route("/baggage/:id/status", put(ground_update_status))
}

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub reservation: Uuid,
    pub weight: f64,
    pub method: Option<PaymentMethod>,
}

#[derive(Debug, Deserialize)]
pub struct ReservationQuery {
    pub reservation: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdated {
    pub message: &'static str,
    pub baggage: Baggage,
}

#[instrument(skip(state, principal, body), fields(user_id = %principal.id()))]
pub async fn check_in(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<CheckInRequest>,
) -> AppResult<(StatusCode, Json<CheckIn>)> {
    let user = principal.require(&[Role::Customer])?;
    let out = services::check_in(&state, user, body.reservation, body.weight, body.method).await?;
    Ok((StatusCode::CREATED, Json(out)))
}

#[instrument(skip(state, principal))]
pub async fn list_for_reservation(
    State(state): State<AppState>,
    principal: Principal,
    Query(q): Query<ReservationQuery>,
) -> AppResult<Json<Vec<Baggage>>> {
    let user = principal.require(&[Role::Customer])?;
    let reservation_id = q
        .reservation
        .ok_or_else(|| AppError::Validation("reservation query parameter is required".into()))?;
    let reservation = reservations::owned_reservation(&state, user, reservation_id).await?;
    Ok(Json(
        state.baggage.baggage_for_reservation(reservation.id).await?,
    ))
}

#[instrument(skip(state, principal, body))]
pub async fn update_status(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<StatusRequest>,
) -> AppResult<Json<Baggage>> {
    principal.require(&[Role::Employee])?;
    Ok(Json(services::set_status(&state, id, &body.status).await?))
}

#[instrument(skip(state, principal))]
pub async fn search(
    State(state): State<AppState>,
    principal: Principal,
    Query(filter): Query<BaggageSearch>,
) -> AppResult<Json<Vec<BaggageTrace>>> {
    let user = principal.require(&[Role::Employee])?;
    services::require_ground_staff(&state, user).await?;
    Ok(Json(state.baggage.search_baggage(&filter).await?))
}

#[instrument(skip(state, principal, body))]
pub async fn ground_update_status(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<StatusRequest>,
) -> AppResult<Json<StatusUpdated>> {
    let user = principal.require(&[Role::Employee])?;
    services::require_ground_staff(&state, user).await?;
    let baggage = services::set_status(&state, id, &body.status).await?;
    Ok(Json(StatusUpdated {
        message: "Status updated",
        baggage,
    }))
}
