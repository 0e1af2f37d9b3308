use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateFlightRequest, UpdateFlightRequest};
use super::model::{Aircraft, Flight, FlightDetail};
use super::services;
use crate::auth::extractors::Principal;
use crate::directory::model::Role;
use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::state::AppState;

pub fn flight_routes() -> Router<AppState> {
    Router::new()
        .route("/flights", get(list_flights).post(create_flight))
        .route("/flights/:id", put(update_flight).delete(delete_flight))
}

pub fn aircraft_routes() -> Router<AppState> {
    Router::new().route("/aircrafts", get(list_aircraft))
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
}

#[instrument(skip(state, principal))]
pub async fn list_flights(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<FlightDetail>>> {
    principal.require(&[Role::Admin, Role::Employee, Role::Customer])?;
    Ok(Json(services::list_detailed(&state).await?))
}

#[instrument(skip(state, principal, body), fields(user_id = %principal.id()))]
pub async fn create_flight(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<CreateFlightRequest>,
) -> AppResult<(StatusCode, Json<Flight>)> {
    principal.require(&[Role::Admin])?;
    let flight = services::create(&state, body.into_flight()?).await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

#[instrument(skip(state, principal, body), fields(user_id = %principal.id()))]
pub async fn update_flight(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<UpdateFlightRequest>,
) -> AppResult<Json<Flight>> {
    principal.require(&[Role::Admin, Role::Employee])?;
    Ok(Json(services::update(&state, id, body).await?))
}

#[instrument(skip(state, principal), fields(user_id = %principal.id()))]
pub async fn delete_flight(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Deleted>> {
    principal.require(&[Role::Admin])?;
    services::delete(&state, id).await?;
    Ok(Json(Deleted {
        message: "Flight deleted",
    }))
}

#[instrument(skip(state, principal))]
pub async fn list_aircraft(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<Aircraft>>> {
    principal.require(&[Role::Admin])?;
    Ok(Json(state.flights.list_aircraft().await?))
}
