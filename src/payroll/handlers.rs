use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use super::model::{GeneratedPayroll, PayrollProjection};
use super::services;
use crate::auth::extractors::Principal;
use crate::directory::model::Role;
use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::state::AppState;

pub fn payroll_routes() -> Router<AppState> {
    Router::new()
        .route("/employees/generate", post(generate))
        .route("/employees/payroll", get(projection))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub start: String,
    pub end: String,
}

#[instrument(skip(state, principal, body), fields(user_id = %principal.id()))]
pub async fn generate(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<GenerateRequest>,
) -> AppResult<Json<GeneratedPayroll>> {
    principal.require(&[Role::Admin])?;
    let (start, end) = services::parse_period(&body.start_date, &body.end_date)?;
    let data = services::generate(&state, start, end).await?;
    Ok(Json(GeneratedPayroll {
        message: "Payroll generated",
        count: data.len(),
        data,
    }))
}

#[instrument(skip(state, principal))]
pub async fn projection(
    State(state): State<AppState>,
    principal: Principal,
    Query(q): Query<PeriodQuery>,
) -> AppResult<Json<Vec<PayrollProjection>>> {
    principal.require(&[Role::Admin])?;
    let (start, end) = services::parse_period(&q.start, &q.end)?;
    Ok(Json(services::project(&state, start, end).await?))
}
