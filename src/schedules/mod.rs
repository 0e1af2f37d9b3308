//! Crew schedules: one row per employee per assigned flight.

pub mod handlers;
pub mod model;
pub mod repo;
pub mod sync;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::schedule_routes()
}
