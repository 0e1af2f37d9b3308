use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::model::{Baggage, BaggageStatus};
use crate::directory::model::{Employee, EmployeeRole, User};
use crate::error::{AppError, AppResult};
use crate::reservations::model::{Payment, PaymentMethod, ReservationStatus};
use crate::reservations::services as reservations;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CheckIn {
    pub baggage: Baggage,
    /// Excess-weight payment; absent when the bag is within the allowance.
    pub payment: Option<Payment>,
}

/// Checks a bag in against a reservation and charges any excess weight.
///
/// The payment method is validated before anything is written.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn check_in(
    state: &AppState,
    user: &User,
    reservation_id: Uuid,
    weight: f64,
    method: Option<PaymentMethod>,
) -> AppResult<CheckIn> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(AppError::Validation("weight must be a positive number".into()));
    }
    let reservation = reservations::owned_reservation(state, user, reservation_id).await?;
    if reservation.status == ReservationStatus::Cancelled {
        return Err(AppError::Validation("Reservation is cancelled".into()));
    }

    let baggage = Baggage::check_in(reservation.id, weight);
    let method = match (baggage.extra_charge > 0.0, method) {
        (true, None) => {
            return Err(AppError::Validation(
                "Payment method required for excess weight".into(),
            ))
        }
        (true, Some(m)) => Some(m),
        (false, _) => None,
    };

    state.baggage.insert_baggage(&baggage).await?;
    let payment = match method {
        Some(m) => {
            let payment = Payment::completed(reservation.id, baggage.extra_charge, m);
            state.bookings.insert_payment(&payment).await?;
            Some(payment)
        }
        None => None,
    };

    info!(
        baggage_id = %baggage.id,
        boarding_pass = %baggage.boarding_pass,
        extra_charge = baggage.extra_charge,
        "baggage checked in"
    );
    Ok(CheckIn { baggage, payment })
}

/// The caller's employee profile, provided it is ground staff.
pub async fn require_ground_staff(state: &AppState, user: &User) -> AppResult<Employee> {
    match state.directory.find_employee_by_user(user.id).await? {
        Some(e) if e.role == EmployeeRole::Ground => Ok(e),
        _ => Err(AppError::Forbidden("Ground staff only".into())),
    }
}

pub async fn set_status(state: &AppState, id: Uuid, status: &str) -> AppResult<Baggage> {
    let status: BaggageStatus = status.parse()?;
    let baggage = state
        .baggage
        .set_baggage_status(id, status)
        .await?
        .ok_or_else(|| AppError::not_found("Baggage"))?;
    info!(baggage_id = %id, ?status, "baggage status updated");
    Ok(baggage)
}
