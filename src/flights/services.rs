use std::collections::HashMap;

use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::UpdateFlightRequest;
use super::model::{Flight, FlightDetail};
use crate::error::{AppError, AppResult};
use crate::schedules::sync;
use crate::state::AppState;

/// Every flight with its aircraft and crew accounts expanded.
pub async fn list_detailed(state: &AppState) -> AppResult<Vec<FlightDetail>> {
    let (flights, aircraft, staff) = tokio::try_join!(
        state.flights.list_flights(),
        state.flights.list_aircraft(),
        state.directory.list_employees(),
    )?;
    let aircraft: HashMap<_, _> = aircraft.into_iter().map(|a| (a.id, a)).collect();
    let staff: HashMap<_, _> = staff.into_iter().map(|e| (e.employee.id, e)).collect();

    Ok(flights
        .into_iter()
        .map(|flight| FlightDetail {
            aircraft_detail: aircraft.get(&flight.aircraft_id).cloned(),
            crew_detail: flight
                .crew
                .iter()
                .filter_map(|id| staff.get(id).cloned())
                .collect(),
            flight,
        })
        .collect())
}

/// Stores the flight and schedules its crew.
#[instrument(skip(state, flight), fields(flight_number = %flight.flight_number))]
pub async fn create(state: &AppState, flight: Flight) -> AppResult<Flight> {
    flight.validate_timing()?;
    state.flights.insert_flight(&flight).await?;
    let scheduled = sync::assign_crew(state, &flight, &flight.crew).await?;
    info!(flight_id = %flight.id, scheduled, "flight created");
    Ok(flight)
}

/// Merges `patch` into the stored flight and reconciles crew schedules.
#[instrument(skip(state, patch))]
pub async fn update(state: &AppState, id: Uuid, patch: UpdateFlightRequest) -> AppResult<Flight> {
    let stored = state
        .flights
        .find_flight(id)
        .await?
        .ok_or_else(|| AppError::not_found("Flight"))?;
    let updated = patch.apply_to(&stored)?;

    state.flights.save_flight(&updated).await?;
    sync::reconcile_crew(state, &stored, &updated).await?;
    info!(flight_id = %id, "flight updated");
    Ok(updated)
}

/// Releases the crew's schedules, then removes the flight.
#[instrument(skip(state))]
pub async fn delete(state: &AppState, id: Uuid) -> AppResult<()> {
    let flight = state
        .flights
        .find_flight(id)
        .await?
        .ok_or_else(|| AppError::not_found("Flight"))?;
    sync::release_crew(state, &flight).await?;
    state.flights.delete_flight(id).await?;
    info!(flight_id = %id, "flight deleted");
    Ok(())
}
