use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::model::ScheduleDetail;
use crate::auth::extractors::Principal;
use crate::directory::model::Role;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn schedule_routes() -> Router<AppState> {
    Router::new().route("/employees/schedule", get(my_schedule))
}

/// The caller's shifts, each with the flight it belongs to.
#[instrument(skip(state, principal), fields(user_id = %principal.id()))]
pub async fn my_schedule(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<ScheduleDetail>>> {
    let user = principal.require(&[Role::Employee])?;
    let employee = state
        .directory
        .find_employee_by_user(user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee"))?;

    let schedules = state.schedules.schedules_for_employee(employee.id).await?;
    let mut out = Vec::with_capacity(schedules.len());
    for schedule in schedules {
        let flight = state.flights.find_flight(schedule.flight_id).await?;
        out.push(ScheduleDetail {
            schedule,
            flight_detail: flight,
        });
    }
    Ok(Json(out))
}
