use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::error::AppResult;
use crate::flights::model::FlightStatus;
use crate::store::PgStore;

/// One group of a count-by aggregate. Serialized as `{"_id", "total"}`, the
/// shape the dashboard front end reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Bucket {
    #[serde(rename = "_id")]
    pub label: String,
    pub total: i64,
}

/// Read-only aggregates for the admin dashboard.
#[async_trait]
pub trait DashboardStore: Send + Sync {
    async fn count_flights_with_status(&self, status: FlightStatus) -> AppResult<i64>;
    async fn count_customers(&self) -> AppResult<i64>;
    async fn flights_by_status(&self) -> AppResult<Vec<Bucket>>;
    /// Sum of completed payments created at or after `since`.
    async fn completed_sales_since(&self, since: OffsetDateTime) -> AppResult<f64>;
    async fn top_destination(&self) -> AppResult<Option<Bucket>>;
    async fn flights_by_aircraft_model(&self) -> AppResult<Vec<Bucket>>;
    async fn reservations_by_status(&self) -> AppResult<Vec<Bucket>>;
    async fn average_baggage_weight(&self) -> AppResult<f64>;
    async fn payments_by_method(&self) -> AppResult<Vec<Bucket>>;
}

#[async_trait]
impl DashboardStore for PgStore {
    async fn count_flights_with_status(&self, status: FlightStatus) -> AppResult<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM flights WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    async fn count_customers(&self) -> AppResult<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    async fn flights_by_status(&self) -> AppResult<Vec<Bucket>> {
        let rows = sqlx::query_as::<_, Bucket>(
            "SELECT status::text AS label, COUNT(*) AS total FROM flights GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn completed_sales_since(&self, since: OffsetDateTime) -> AppResult<f64> {
        let total = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT COALESCE(SUM(amount), 0)::float8
              FROM payments
             WHERE status = 'completed' AND created_at >= $1
            "#,
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn top_destination(&self) -> AppResult<Option<Bucket>> {
        let row = sqlx::query_as::<_, Bucket>(
            r#"
            SELECT f.destination AS label, COUNT(*) AS total
              FROM reservations r
              JOIN flights f ON f.id = r.flight_id
             GROUP BY f.destination
             ORDER BY total DESC
             LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn flights_by_aircraft_model(&self) -> AppResult<Vec<Bucket>> {
        let rows = sqlx::query_as::<_, Bucket>(
            r#"
            SELECT a.model AS label, COUNT(*) AS total
              FROM flights f
              JOIN aircraft a ON a.id = f.aircraft_id
             GROUP BY a.model
             ORDER BY total DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn reservations_by_status(&self) -> AppResult<Vec<Bucket>> {
        let rows = sqlx::query_as::<_, Bucket>(
            "SELECT status::text AS label, COUNT(*) AS total FROM reservations GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn average_baggage_weight(&self) -> AppResult<f64> {
        let avg = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(AVG(weight), 0)::float8 FROM baggage",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(avg)
    }

    async fn payments_by_method(&self) -> AppResult<Vec<Bucket>> {
        let rows = sqlx::query_as::<_, Bucket>(
            "SELECT method::text AS label, COUNT(*) AS total FROM payments GROUP BY method",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
