use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Baggage, BaggageSearch, BaggageStatus, BaggageTrace};
use crate::error::AppResult;
use crate::store::PgStore;

#[async_trait]
pub trait BaggageStore: Send + Sync {
    async fn insert_baggage(&self, baggage: &Baggage) -> AppResult<()>;
    async fn set_baggage_status(
        &self,
        id: Uuid,
        status: BaggageStatus,
    ) -> AppResult<Option<Baggage>>;
    async fn baggage_for_reservation(&self, reservation_id: Uuid) -> AppResult<Vec<Baggage>>;
    async fn search_baggage(&self, filter: &BaggageSearch) -> AppResult<Vec<BaggageTrace>>;
}

const BAGGAGE_COLUMNS: &str =
    "id, reservation_id, weight, status, boarding_pass, extra_charge, created_at";

#[async_trait]
impl BaggageStore for PgStore {
    async fn insert_baggage(&self, b: &Baggage) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO baggage (id, reservation_id, weight, status, boarding_pass,
                                 extra_charge, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(b.id)
        .bind(b.reservation_id)
        .bind(b.weight)
        .bind(b.status)
        .bind(&b.boarding_pass)
        .bind(b.extra_charge)
        .bind(b.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_baggage_status(
        &self,
        id: Uuid,
        status: BaggageStatus,
    ) -> AppResult<Option<Baggage>> {
        let b = sqlx::query_as::<_, Baggage>(&format!(
            "UPDATE baggage SET status = $2 WHERE id = $1 RETURNING {BAGGAGE_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(b)
    }

    async fn baggage_for_reservation(&self, reservation_id: Uuid) -> AppResult<Vec<Baggage>> {
        let rows = sqlx::query_as::<_, Baggage>(&format!(
            "SELECT {BAGGAGE_COLUMNS} FROM baggage WHERE reservation_id = $1 ORDER BY created_at"
        ))
        .bind(reservation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn search_baggage(&self, filter: &BaggageSearch) -> AppResult<Vec<BaggageTrace>> {
        let rows = sqlx::query_as::<_, BaggageTrace>(
            r#"
            SELECT b.id, b.reservation_id, b.weight, b.status, b.boarding_pass,
                   b.extra_charge, b.created_at,
                   r.ticket_number, r.seat_number,
                   f.flight_number, u.email AS customer_email
              FROM baggage b
              JOIN reservations r ON r.id = b.reservation_id
              LEFT JOIN flights f ON f.id = r.flight_id
              LEFT JOIN customers c ON c.id = r.customer_id
              LEFT JOIN users u ON u.id = c.user_id
             WHERE ($1::uuid IS NULL OR b.reservation_id = $1)
               AND ($2::text IS NULL OR b.boarding_pass ILIKE '%' || $2 || '%')
               AND ($3::text IS NULL OR u.email ILIKE '%' || $3 || '%')
             ORDER BY b.created_at DESC
            "#,
        )
        .bind(filter.reservation)
        .bind(filter.boarding_pass.as_deref())
        .bind(filter.email.as_deref())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
