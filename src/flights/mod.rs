//! Flights, aircraft and the crew schedule sync triggered by flight edits.

mod dto;
pub mod handlers;
pub mod model;
pub mod repo;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::flight_routes())
        .merge(handlers::aircraft_routes())
}
