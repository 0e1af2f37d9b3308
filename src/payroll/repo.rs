use async_trait::async_trait;

use super::model::Payroll;
use crate::error::AppResult;
use crate::store::PgStore;

#[async_trait]
pub trait PayrollStore: Send + Sync {
    async fn insert_payroll(&self, payroll: &Payroll) -> AppResult<()>;
}

#[async_trait]
impl PayrollStore for PgStore {
    async fn insert_payroll(&self, p: &Payroll) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payrolls (id, employee_id, start_date, end_date, total_hours,
                                  hourly_rate, total_pay, generated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(p.id)
        .bind(p.employee_id)
        .bind(p.start_date)
        .bind(p.end_date)
        .bind(p.total_hours)
        .bind(p.hourly_rate)
        .bind(p.total_pay)
        .bind(p.generated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
