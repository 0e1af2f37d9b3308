use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{CrewShift, Schedule, ShiftTiming};
use crate::error::AppResult;
use crate::store::PgStore;

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn insert_schedule(&self, schedule: &Schedule) -> AppResult<()>;
    /// Deletes the rows of `employees` on `flight_id`; returns how many went.
    async fn delete_schedules(&self, flight_id: Uuid, employees: &[Uuid]) -> AppResult<u64>;
    /// Rewrites day/start/end on the rows of `employees` on `flight_id`.
    async fn retime_schedules(
        &self,
        flight_id: Uuid,
        employees: &[Uuid],
        timing: &ShiftTiming,
    ) -> AppResult<u64>;
    async fn schedules_for_employee(&self, employee_id: Uuid) -> AppResult<Vec<Schedule>>;
    /// Shifts whose flight departs within `[start, end]`.
    async fn shifts_departing_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> AppResult<Vec<CrewShift>>;
}

#[async_trait]
impl ScheduleStore for PgStore {
    async fn insert_schedule(&self, s: &Schedule) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO schedules (id, employee_id, flight_id, day, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(s.id)
        .bind(s.employee_id)
        .bind(s.flight_id)
        .bind(&s.day)
        .bind(&s.start_time)
        .bind(&s.end_time)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_schedules(&self, flight_id: Uuid, employees: &[Uuid]) -> AppResult<u64> {
        if employees.is_empty() {
            return Ok(0);
        }
        let res = sqlx::query(
            "DELETE FROM schedules WHERE flight_id = $1 AND employee_id = ANY($2)",
        )
        .bind(flight_id)
        .bind(employees)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    async fn retime_schedules(
        &self,
        flight_id: Uuid,
        employees: &[Uuid],
        timing: &ShiftTiming,
    ) -> AppResult<u64> {
        if employees.is_empty() {
            return Ok(0);
        }
        let res = sqlx::query(
            r#"
            UPDATE schedules
               SET day = $3, start_time = $4, end_time = $5, updated_at = now()
             WHERE flight_id = $1 AND employee_id = ANY($2)
            "#,
        )
        .bind(flight_id)
        .bind(employees)
        .bind(&timing.day)
        .bind(&timing.start_time)
        .bind(&timing.end_time)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    async fn schedules_for_employee(&self, employee_id: Uuid) -> AppResult<Vec<Schedule>> {
        let rows = sqlx::query_as::<_, Schedule>(
            r#"
            SELECT id, employee_id, flight_id, day, start_time, end_time
              FROM schedules
             WHERE employee_id = $1
             ORDER BY created_at
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn shifts_departing_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> AppResult<Vec<CrewShift>> {
        let rows = sqlx::query_as::<_, CrewShift>(
            r#"
            SELECT s.employee_id, f.departure_time, f.arrival_time
              FROM schedules s
              JOIN flights f ON f.id = s.flight_id
             WHERE f.departure_time BETWEEN $1 AND $2
             ORDER BY f.departure_time
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
