use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{PaymentMethod, Reservation};
use crate::flights::model::{Aircraft, Flight};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub flight: Uuid,
    pub seat_number: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub reservation: Uuid,
    pub amount: f64,
    #[serde(default)]
    pub method: PaymentMethod,
}

/// A customer's reservation with the flight and aircraft it refers to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub flight_detail: Option<Flight>,
    pub aircraft_detail: Option<Aircraft>,
}
