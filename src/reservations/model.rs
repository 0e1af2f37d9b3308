use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Refunded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Paypal,
    DebitCard,
    Cash,
}

/// `PREFIX-` followed by nine random uppercase alphanumerics.
pub(crate) fn random_code(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect();
    format!("{prefix}-{suffix}")
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    #[serde(rename = "customer")]
    pub customer_id: Uuid,
    #[serde(rename = "flight")]
    pub flight_id: Uuid,
    pub seat_number: String,
    pub ticket_number: String,
    pub status: ReservationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Reservation {
    /// New confirmed reservation with a fresh ticket number.
    pub fn confirmed(customer_id: Uuid, flight_id: Uuid, seat_number: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            flight_id,
            seat_number,
            ticket_number: random_code("TICKET"),
            status: ReservationStatus::Confirmed,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    #[serde(rename = "reservation")]
    pub reservation_id: Uuid,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Payment {
    pub fn completed(reservation_id: Uuid, amount: f64, method: PaymentMethod) -> Self {
        Self {
            id: Uuid::new_v4(),
            reservation_id,
            amount,
            method,
            status: PaymentStatus::Completed,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}
