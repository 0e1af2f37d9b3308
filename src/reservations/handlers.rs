use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreatePaymentRequest, CreateReservationRequest, ReservationDetail};
use super::model::Payment;
use super::services::{self, Booking, BookingRequest, Cancellation};
use crate::auth::extractors::Principal;
use crate::directory::model::Role;
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::state::AppState;

pub fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/reservations", post(create_reservation).get(my_reservations))
        .route("/reservations/:id/cancel", put(cancel_reservation))
        .route("/reservations/occupied/:flight_id", get(occupied_seats))
}

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payments", post(create_payment))
        .route("/payments/:id/refund", put(refund_payment))
}

#[instrument(skip(state, principal, body), fields(user_id = %principal.id()))]
pub async fn create_reservation(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let user = principal.require(&[Role::Customer])?;
    if body.seat_number.trim().is_empty() {
        return Err(AppError::Validation("seatNumber is required".into()));
    }
    let booking = services::book(
        &state,
        user,
        BookingRequest {
            flight_id: body.flight,
            seat_number: body.seat_number.trim().to_string(),
            method: body.payment_method,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[instrument(skip(state, principal), fields(user_id = %principal.id()))]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Cancellation>> {
    let user = principal.require(&[Role::Customer])?;
    Ok(Json(services::cancel(&state, user, id).await?))
}

#[instrument(skip(state, principal), fields(user_id = %principal.id()))]
pub async fn my_reservations(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<ReservationDetail>>> {
    let user = principal.require(&[Role::Customer])?;
    let customer = state
        .directory
        .find_customer_by_user(user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer"))?;

    let reservations = state.bookings.reservations_for_customer(customer.id).await?;
    let mut out = Vec::with_capacity(reservations.len());
    for reservation in reservations {
        let flight = state.flights.find_flight(reservation.flight_id).await?;
        let aircraft = match &flight {
            Some(f) => state.flights.find_aircraft(f.aircraft_id).await?,
            None => None,
        };
        out.push(ReservationDetail {
            reservation,
            flight_detail: flight,
            aircraft_detail: aircraft,
        });
    }
    Ok(Json(out))
}

#[instrument(skip(state, principal))]
pub async fn occupied_seats(
    State(state): State<AppState>,
    principal: Principal,
    Path(flight_id): Path<Uuid>,
) -> AppResult<Json<Vec<String>>> {
    principal.require(&[Role::Admin, Role::Employee, Role::Customer])?;
    Ok(Json(state.bookings.occupied_seats(flight_id).await?))
}

/// Records an extra completed payment against one of the caller's reservations.
#[instrument(skip(state, principal, body), fields(user_id = %principal.id()))]
pub async fn create_payment(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<CreatePaymentRequest>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    let user = principal.require(&[Role::Customer])?;
    let payment =
        services::record_payment(&state, user, body.reservation, body.amount, body.method).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[instrument(skip(state, principal))]
pub async fn refund_payment(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Payment>> {
    principal.require(&[Role::Admin])?;
    let payment = services::refund_payment(&state, id).await?;
    info!(payment_id = %payment.id, "payment refunded");
    Ok(Json(payment))
}
