use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{Flight, FlightStatus};
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlightRequest {
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    #[serde(with = "time::serde::rfc3339")]
    pub departure_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub arrival_time: OffsetDateTime,
    pub aircraft: Uuid,
    #[serde(default)]
    pub crew: Vec<Uuid>,
    #[serde(default)]
    pub status: FlightStatus,
    pub price: Option<f64>,
}

impl CreateFlightRequest {
    pub fn into_flight(self) -> AppResult<Flight> {
        for (field, value) in [
            ("flightNumber", &self.flight_number),
            ("origin", &self.origin),
            ("destination", &self.destination),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} is required")));
            }
        }
        let flight = Flight {
            id: Uuid::new_v4(),
            flight_number: self.flight_number.trim().to_string(),
            origin: self.origin.trim().to_string(),
            destination: self.destination.trim().to_string(),
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            aircraft_id: self.aircraft,
            crew: dedup(self.crew),
            status: self.status,
            price: self.price,
            created_at: OffsetDateTime::now_utc(),
        };
        flight.validate_timing()?;
        Ok(flight)
    }
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFlightRequest {
    pub flight_number: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub departure_time: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub arrival_time: Option<OffsetDateTime>,
    pub aircraft: Option<Uuid>,
    pub crew: Option<Vec<Uuid>>,
    pub status: Option<FlightStatus>,
    pub price: Option<f64>,
}

impl UpdateFlightRequest {
    /// The stored flight with every provided field overwritten.
    pub fn apply_to(self, stored: &Flight) -> AppResult<Flight> {
        let mut flight = stored.clone();
        if let Some(v) = self.flight_number {
            flight.flight_number = v.trim().to_string();
        }
        if let Some(v) = self.origin {
            flight.origin = v.trim().to_string();
        }
        if let Some(v) = self.destination {
            flight.destination = v.trim().to_string();
        }
        if let Some(v) = self.departure_time {
            flight.departure_time = v;
        }
        if let Some(v) = self.arrival_time {
            flight.arrival_time = v;
        }
        if let Some(v) = self.aircraft {
            flight.aircraft_id = v;
        }
        if let Some(v) = self.crew {
            flight.crew = dedup(v);
        }
        if let Some(v) = self.status {
            flight.status = v;
        }
        if self.price.is_some() {
            flight.price = self.price;
        }
        if flight.flight_number.is_empty() {
            return Err(AppError::Validation("flightNumber is required".into()));
        }
        flight.validate_timing()?;
        Ok(flight)
    }
}

fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
