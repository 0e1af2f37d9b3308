use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use time::{Date, Duration, OffsetDateTime, Time};
use tracing::instrument;

use super::repo::Bucket;
use crate::auth::extractors::Principal;
use crate::directory::model::Role;
use crate::error::AppResult;
use crate::flights::model::FlightStatus;
use crate::state::AppState;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/vuelos-programados", get(scheduled_flights))
        .route("/dashboard/clientes", get(customers))
        .route("/dashboard/vuelos-por-estado", get(flights_by_status))
        .route("/dashboard/ventas", get(sales))
        .route("/dashboard/destino-popular", get(top_destination))
        .route("/dashboard/vuelos-por-avion", get(flights_by_aircraft))
        .route("/dashboard/reservas-por-estado", get(reservations_by_status))
        .route("/dashboard/promedio-equipaje", get(average_baggage))
        .route("/dashboard/metodos-pago", get(payment_methods))
}

#[derive(Debug, Serialize)]
pub struct Total {
    pub total: i64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Sales {
    #[serde(rename = "semanal")]
    pub week: f64,
    #[serde(rename = "mensual")]
    pub month: f64,
    #[serde(rename = "anual")]
    pub year: f64,
}

#[derive(Debug, Serialize)]
pub struct Average {
    #[serde(rename = "promedio")]
    pub average: f64,
}

/// Midnight UTC at the start of the current week (Sunday), month and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesPeriods {
    pub week: OffsetDateTime,
    pub month: OffsetDateTime,
    pub year: OffsetDateTime,
}

impl SalesPeriods {
    pub fn containing(now: OffsetDateTime) -> anyhow::Result<Self> {
        let today = now.to_offset(time::UtcOffset::UTC).date();
        let week = today - Duration::days(i64::from(today.weekday().number_days_from_sunday()));
        let month = Date::from_calendar_date(today.year(), today.month(), 1)?;
        let year = Date::from_ordinal_date(today.year(), 1)?;
        let at_midnight = |d: Date| d.with_time(Time::MIDNIGHT).assume_utc();
        Ok(Self {
            week: at_midnight(week),
            month: at_midnight(month),
            year: at_midnight(year),
        })
    }
}

#[instrument(skip_all)]
pub async fn scheduled_flights(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Total>> {
    principal.require(&[Role::Admin])?;
    let total = state
        .dashboard
        .count_flights_with_status(FlightStatus::Scheduled)
        .await?;
    Ok(Json(Total { total }))
}

#[instrument(skip_all)]
pub async fn customers(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Total>> {
    principal.require(&[Role::Admin])?;
    Ok(Json(Total {
        total: state.dashboard.count_customers().await?,
    }))
}

#[instrument(skip_all)]
pub async fn flights_by_status(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<Bucket>>> {
    principal.require(&[Role::Admin])?;
    Ok(Json(state.dashboard.flights_by_status().await?))
}

/// Completed sales this week, month and year; the three sums run concurrently.
#[instrument(skip_all)]
pub async fn sales(State(state): State<AppState>, principal: Principal) -> AppResult<Json<Sales>> {
    principal.require(&[Role::Admin])?;
    let periods = SalesPeriods::containing(OffsetDateTime::now_utc())?;
    let (week, month, year) = tokio::try_join!(
        state.dashboard.completed_sales_since(periods.week),
        state.dashboard.completed_sales_since(periods.month),
        state.dashboard.completed_sales_since(periods.year),
    )?;
    Ok(Json(Sales { week, month, year }))
}

#[instrument(skip_all)]
pub async fn top_destination(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Bucket>> {
    principal.require(&[Role::Admin])?;
    let top = state.dashboard.top_destination().await?.unwrap_or(Bucket {
        label: "N/A".into(),
        total: 0,
    });
    Ok(Json(top))
}

#[instrument(skip_all)]
pub async fn flights_by_aircraft(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<Bucket>>> {
    principal.require(&[Role::Admin])?;
    Ok(Json(state.dashboard.flights_by_aircraft_model().await?))
}

#[instrument(skip_all)]
pub async fn reservations_by_status(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<Bucket>>> {
    principal.require(&[Role::Admin])?;
    Ok(Json(state.dashboard.reservations_by_status().await?))
}

#[instrument(skip_all)]
pub async fn average_baggage(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Average>> {
    principal.require(&[Role::Admin])?;
    Ok(Json(Average {
        average: state.dashboard.average_baggage_weight().await?,
    }))
}

#[instrument(skip_all)]
pub async fn payment_methods(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<Bucket>>> {
    principal.require(&[Role::Admin])?;
    Ok(Json(state.dashboard.payments_by_method().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn periods_start_at_utc_midnight() {
        // Wednesday
        let p = SalesPeriods::containing(datetime!(2024-05-15 17:45 UTC)).unwrap();
        assert_eq!(p.week, datetime!(2024-05-12 00:00 UTC));
        assert_eq!(p.month, datetime!(2024-05-01 00:00 UTC));
        assert_eq!(p.year, datetime!(2024-01-01 00:00 UTC));
    }

    #[test]
    fn sunday_starts_its_own_week() {
        let p = SalesPeriods::containing(datetime!(2024-03-03 01:00 UTC)).unwrap();
        assert_eq!(p.week, datetime!(2024-03-03 00:00 UTC));
        assert_eq!(p.month, datetime!(2024-03-01 00:00 UTC));
    }

    #[test]
    fn sales_use_front_end_field_names() {
        let json = serde_json::to_value(Sales {
            week: 1.0,
            month: 2.0,
            year: 3.0,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"semanal": 1.0, "mensual": 2.0, "anual": 3.0}));
    }
}
