//! Payroll from worked flights: hours are the duration of every flight an
//! employee is scheduled on, paid at the rate of their role.

use std::collections::HashMap;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::model::{PayLine, Payroll, PayrollProjection};
use crate::directory::model::{Employee, EmployeeRole};
use crate::error::{AppError, AppResult};
use crate::schedules::model::CrewShift;
use crate::state::AppState;

pub const fn hourly_rate(role: EmployeeRole) -> f64 {
    match role {
        EmployeeRole::Pilot => 300.0,
        EmployeeRole::Crew => 200.0,
        EmployeeRole::Ground => 180.0,
    }
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_bound(raw: &str) -> AppResult<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(at);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(|d| d.midnight().assume_utc())
        .map_err(|_| AppError::Validation(format!("Invalid date: {raw}")))
}

/// Both bounds, in order.
pub fn parse_period(start: &str, end: &str) -> AppResult<(OffsetDateTime, OffsetDateTime)> {
    let (start, end) = (parse_bound(start)?, parse_bound(end)?);
    if start > end {
        return Err(AppError::Validation("start must not be after end".into()));
    }
    Ok((start, end))
}

/// Sums shift hours per employee. Shifts whose employee is not in `staff`
/// are ignored. Output order follows first appearance in `shifts`.
pub fn aggregate(shifts: &[CrewShift], staff: &HashMap<Uuid, Employee>) -> Vec<PayLine> {
    let mut order: Vec<Uuid> = Vec::new();
    let mut hours: HashMap<Uuid, f64> = HashMap::new();
    for shift in shifts {
        if !staff.contains_key(&shift.employee_id) {
            continue;
        }
        let entry = hours.entry(shift.employee_id).or_insert_with(|| {
            order.push(shift.employee_id);
            0.0
        });
        *entry += shift.hours();
    }
    order
        .into_iter()
        .filter_map(|id| {
            let role = staff.get(&id)?.role;
            Some(PayLine {
                employee_id: id,
                role,
                hours: hours.get(&id).copied().unwrap_or_default(),
                rate: hourly_rate(role),
            })
        })
        .collect()
}

/// Pay lines for flights departing within `[start, end]`.
pub async fn compute(
    state: &AppState,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> AppResult<Vec<PayLine>> {
    let shifts = state.schedules.shifts_departing_between(start, end).await?;
    let mut staff = HashMap::new();
    for shift in &shifts {
        if staff.contains_key(&shift.employee_id) {
            continue;
        }
        match state.directory.find_employee(shift.employee_id).await? {
            Some(e) => {
                staff.insert(e.id, e);
            }
            None => debug!(
                employee_id = %shift.employee_id,
                "schedule of unknown employee skipped"
            ),
        }
    }
    Ok(aggregate(&shifts, &staff))
}

/// Computes and stores one payroll row per employee.
#[instrument(skip(state))]
pub async fn generate(
    state: &AppState,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> AppResult<Vec<Payroll>> {
    let lines = compute(state, start, end).await?;
    let mut saved = Vec::with_capacity(lines.len());
    for line in lines {
        let payroll = line.into_payroll(start, end);
        state.payroll.insert_payroll(&payroll).await?;
        saved.push(payroll);
    }
    info!(count = saved.len(), "payroll generated");
    Ok(saved)
}

/// Same figures as [`generate`] without storing anything.
pub async fn project(
    state: &AppState,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> AppResult<Vec<PayrollProjection>> {
    let lines = compute(state, start, end).await?;
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let email = match state.directory.find_employee(line.employee_id).await? {
            Some(e) => state
                .directory
                .find_user(e.user_id)
                .await?
                .map(|u| u.email)
                .unwrap_or_default(),
            None => String::new(),
        };
        out.push(PayrollProjection {
            employee: email,
            role: line.role,
            hours: format!("{:.2}", line.hours),
            rate: line.rate,
            total_pay: format!("{:.2}", line.total_pay()),
        });
    }
    Ok(out)
}
