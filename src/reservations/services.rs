//! Booking and cancellation workflows.
//!
//! Each workflow is a sequence of independent writes: reservation, payment,
//! loyalty ledger, then the customer mail. There is no surrounding
//! transaction, so a failure part-way leaves the earlier writes in place.

use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::model::{Payment, PaymentMethod, PaymentStatus, Reservation, ReservationStatus};
use crate::directory::loyalty::{FrequentFlyer, Tier, BOOKING_REWARD_POINTS};
use crate::directory::model::User;
use crate::error::{AppError, AppResult};
use crate::flights::model::Flight;
use crate::notify::{FlightLeg, ReservationNotice};
use crate::state::AppState;

/// Fare charged when the flight is unknown or carries no price.
pub const DEFAULT_FARE: f64 = 500.0;

/// Price breakdown for one booking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub original_amount: f64,
    pub discount_applied: f64,
    pub final_amount: f64,
}

impl Quote {
    pub fn new(price: f64, tier: Tier) -> Self {
        let discount = price * tier.discount_rate();
        Self {
            original_amount: price,
            discount_applied: discount,
            final_amount: price - discount,
        }
    }
}

fn fare_for(flight: Option<&Flight>, flight_id: Uuid) -> f64 {
    match flight.and_then(|f| f.price) {
        Some(price) if price > 0.0 => price,
        _ => {
            warn!(
                %flight_id,
                fare = DEFAULT_FARE,
                "flight missing or unpriced; charging default fare"
            );
            DEFAULT_FARE
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub flight_id: Uuid,
    pub seat_number: String,
    pub method: PaymentMethod,
}

/// Payment as shown to the customer right after booking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    #[serde(flatten)]
    pub payment: Payment,
    pub original_amount: f64,
    pub discount_applied: f64,
    /// Tier the discount was computed from, before this booking's points.
    pub frequent_flyer_status: Tier,
}

#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub reservation: Reservation,
    pub payment: Receipt,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cancellation {
    pub reservation: Reservation,
    pub refund_amount: f64,
}

/// Applies `delta` points to a customer's ledger and recomputes the tier.
/// Returns the new ledger, or `None` if the customer no longer exists.
pub async fn adjust_frequent_flyer(
    state: &AppState,
    customer_id: Uuid,
    delta: i32,
) -> AppResult<Option<FrequentFlyer>> {
    let Some(customer) = state.directory.find_customer(customer_id).await? else {
        return Ok(None);
    };
    let mut ledger = customer.frequent_flyer;
    ledger.adjust(delta);
    state
        .directory
        .save_frequent_flyer(customer_id, &ledger)
        .await?;
    Ok(Some(ledger))
}

fn notice(reservation: &Reservation, flight: Option<&Flight>) -> ReservationNotice {
    ReservationNotice {
        ticket_number: reservation.ticket_number.clone(),
        seat_number: reservation.seat_number.clone(),
        flight: flight.map(|f| FlightLeg {
            flight_number: f.flight_number.clone(),
            origin: f.origin.clone(),
            destination: f.destination.clone(),
            departure_time: f.departure_time,
        }),
    }
}

#[instrument(skip(state, user, req), fields(user_id = %user.id, flight_id = %req.flight_id))]
pub async fn book(state: &AppState, user: &User, req: BookingRequest) -> AppResult<Booking> {
    let customer = state
        .directory
        .find_customer_by_user(user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer"))?;

    let reservation = Reservation::confirmed(customer.id, req.flight_id, req.seat_number);
    state.bookings.insert_reservation(&reservation).await?;

    let flight = state.flights.find_flight(req.flight_id).await?;
    let tier = customer.frequent_flyer.status;
    let quote = Quote::new(fare_for(flight.as_ref(), req.flight_id), tier);

    let payment = Payment::completed(reservation.id, quote.final_amount, req.method);
    state.bookings.insert_payment(&payment).await?;

    adjust_frequent_flyer(state, customer.id, BOOKING_REWARD_POINTS).await?;

    state
        .notifier
        .booking_confirmed(&user.email, &notice(&reservation, flight.as_ref()))
        .await?;

    info!(
        reservation_id = %reservation.id,
        ticket = %reservation.ticket_number,
        amount = quote.final_amount,
        ?tier,
        "reservation booked"
    );
    Ok(Booking {
        reservation,
        payment: Receipt {
            payment,
            original_amount: quote.original_amount,
            discount_applied: quote.discount_applied,
            frequent_flyer_status: tier,
        },
    })
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn cancel(
    state: &AppState,
    user: &User,
    reservation_id: Uuid,
) -> AppResult<Cancellation> {
    let mut reservation = state
        .bookings
        .find_reservation(reservation_id)
        .await?
        .ok_or_else(|| AppError::not_found("Reservation"))?;

    let owner = state.directory.find_customer_by_user(user.id).await?;
    if owner.map(|c| c.id) != Some(reservation.customer_id) {
        return Err(AppError::Forbidden(
            "Not allowed to cancel this reservation".into(),
        ));
    }

    if reservation.status == ReservationStatus::Cancelled {
        warn!(%reservation_id, "reservation already cancelled; repeating cancellation");
    }
    state
        .bookings
        .set_reservation_status(reservation.id, ReservationStatus::Cancelled)
        .await?;
    reservation.status = ReservationStatus::Cancelled;

    adjust_frequent_flyer(state, reservation.customer_id, -BOOKING_REWARD_POINTS).await?;

    let mut refund_amount = 0.0;
    if let Some(payment) = state.bookings.first_payment_for(reservation.id).await? {
        if payment.status == PaymentStatus::Completed {
            state
                .bookings
                .set_payment_status(payment.id, PaymentStatus::Refunded)
                .await?;
            refund_amount = payment.amount;
        }
    }

    let flight = state.flights.find_flight(reservation.flight_id).await?;
    state
        .notifier
        .booking_cancelled(
            &user.email,
            &notice(&reservation, flight.as_ref()),
            refund_amount,
        )
        .await?;

    info!(%reservation_id, refund_amount, "reservation cancelled");
    Ok(Cancellation {
        reservation,
        refund_amount,
    })
}

/// Loads the reservation and checks it belongs to `user`'s customer profile.
pub async fn owned_reservation(
    state: &AppState,
    user: &User,
    reservation_id: Uuid,
) -> AppResult<Reservation> {
    let reservation = state
        .bookings
        .find_reservation(reservation_id)
        .await?
        .ok_or_else(|| AppError::not_found("Reservation"))?;
    let owner = state.directory.find_customer_by_user(user.id).await?;
    if owner.map(|c| c.id) != Some(reservation.customer_id) {
        return Err(AppError::Forbidden("Reservation belongs to another customer".into()));
    }
    Ok(reservation)
}

/// Records an extra completed payment against one of `user`'s reservations.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn record_payment(
    state: &AppState,
    user: &User,
    reservation_id: Uuid,
    amount: f64,
    method: PaymentMethod,
) -> AppResult<Payment> {
    if amount.is_nan() || amount <= 0.0 {
        return Err(AppError::Validation("amount must be positive".into()));
    }
    let reservation = owned_reservation(state, user, reservation_id).await?;

    let payment = Payment::completed(reservation.id, amount, method);
    state.bookings.insert_payment(&payment).await?;
    info!(payment_id = %payment.id, amount, "payment recorded");
    Ok(payment)
}

/// Refunds a completed payment; any other status is rejected.
#[instrument(skip(state))]
pub async fn refund_payment(state: &AppState, payment_id: Uuid) -> AppResult<Payment> {
    let payment = state
        .bookings
        .find_payment(payment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Payment"))?;
    if payment.status != PaymentStatus::Completed {
        return Err(AppError::Validation(format!(
            "Only completed payments can be refunded (status: {:?})",
            payment.status
        )));
    }
    state
        .bookings
        .set_payment_status(payment.id, PaymentStatus::Refunded)
        .await?
        .ok_or_else(|| AppError::not_found("Payment"))
}
