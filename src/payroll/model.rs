use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::directory::model::EmployeeRole;

/// Persisted pay snapshot for one employee over one period.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payroll {
    pub id: Uuid,
    #[serde(rename = "employee")]
    pub employee_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_date: OffsetDateTime,
    pub total_hours: f64,
    pub hourly_rate: f64,
    pub total_pay: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
}

/// Hours and pay accumulated by one employee within a period.
#[derive(Debug, Clone, PartialEq)]
pub struct PayLine {
    pub employee_id: Uuid,
    pub role: EmployeeRole,
    pub hours: f64,
    pub rate: f64,
}

impl PayLine {
    pub fn total_pay(&self) -> f64 {
        self.hours * self.rate
    }

    pub fn into_payroll(self, start: OffsetDateTime, end: OffsetDateTime) -> Payroll {
        Payroll {
            id: Uuid::new_v4(),
            employee_id: self.employee_id,
            start_date: start,
            end_date: end,
            total_hours: self.hours,
            hourly_rate: self.rate,
            total_pay: self.total_pay(),
            generated_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Read-only payroll row; hours and pay are rendered with two decimals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollProjection {
    /// Email of the employee's account.
    pub employee: String,
    pub role: EmployeeRole,
    pub hours: String,
    pub rate: f64,
    pub total_pay: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPayroll {
    pub message: &'static str,
    pub count: usize,
    pub data: Vec<Payroll>,
}
