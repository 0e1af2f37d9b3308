use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::directory::model::EmployeeAccount;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "flight_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    #[default]
    Scheduled,
    Delayed,
    Cancelled,
    Departed,
    Arrived,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    pub id: Uuid,
    pub model: String,
    pub total_seats: i32,
    pub seat_map: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: Uuid,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    #[serde(with = "time::serde::rfc3339")]
    pub departure_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub arrival_time: OffsetDateTime,
    #[serde(rename = "aircraft")]
    pub aircraft_id: Uuid,
    /// Employee ids assigned to this flight.
    pub crew: Vec<Uuid>,
    pub status: FlightStatus,
    /// Fare before any loyalty discount; bookings fall back to a default when absent.
    pub price: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Flight {
    /// Departure must come strictly before arrival.
    pub fn validate_timing(&self) -> AppResult<()> {
        if self.departure_time >= self.arrival_time {
            return Err(AppError::Validation(
                "departureTime must be before arrivalTime".into(),
            ));
        }
        Ok(())
    }
}

/// Flight with its aircraft and crew expanded, as shown in listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDetail {
    #[serde(flatten)]
    pub flight: Flight,
    pub aircraft_detail: Option<Aircraft>,
    pub crew_detail: Vec<EmployeeAccount>,
}
