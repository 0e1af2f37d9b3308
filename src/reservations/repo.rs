use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Payment, PaymentStatus, Reservation, ReservationStatus};
use crate::error::AppResult;
use crate::store::PgStore;

/// Reservations and the payments recorded against them.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_reservation(&self, reservation: &Reservation) -> AppResult<()>;
    async fn find_reservation(&self, id: Uuid) -> AppResult<Option<Reservation>>;
    async fn set_reservation_status(&self, id: Uuid, status: ReservationStatus) -> AppResult<()>;
    async fn reservations_for_customer(&self, customer_id: Uuid) -> AppResult<Vec<Reservation>>;
    /// Seat numbers held by confirmed reservations on `flight_id`.
    async fn occupied_seats(&self, flight_id: Uuid) -> AppResult<Vec<String>>;

    async fn insert_payment(&self, payment: &Payment) -> AppResult<()>;
    async fn find_payment(&self, id: Uuid) -> AppResult<Option<Payment>>;
    /// Earliest payment recorded against the reservation (the booking fare).
    async fn first_payment_for(&self, reservation_id: Uuid) -> AppResult<Option<Payment>>;
    async fn set_payment_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
    ) -> AppResult<Option<Payment>>;
}

const RESERVATION_COLUMNS: &str =
    "id, customer_id, flight_id, seat_number, ticket_number, status, created_at";
const PAYMENT_COLUMNS: &str = "id, reservation_id, amount, method, status, created_at";

#[async_trait]
impl BookingStore for PgStore {
    async fn insert_reservation(&self, r: &Reservation) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reservations (id, customer_id, flight_id, seat_number, ticket_number,
                                      status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(r.id)
        .bind(r.customer_id)
        .bind(r.flight_id)
        .bind(&r.seat_number)
        .bind(&r.ticket_number)
        .bind(r.status)
        .bind(r.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_reservation(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        let r = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(r)
    }

    async fn set_reservation_status(&self, id: Uuid, status: ReservationStatus) -> AppResult<()> {
        sqlx::query("UPDATE reservations SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn reservations_for_customer(&self, customer_id: Uuid) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations \
              WHERE customer_id = $1 ORDER BY created_at"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn occupied_seats(&self, flight_id: Uuid) -> AppResult<Vec<String>> {
        let seats = sqlx::query_scalar::<_, String>(
            r#"
            SELECT seat_number
              FROM reservations
             WHERE flight_id = $1 AND status = 'confirmed'
             ORDER BY created_at
            "#,
        )
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(seats)
    }

    async fn insert_payment(&self, p: &Payment) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (id, reservation_id, amount, method, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(p.id)
        .bind(p.reservation_id)
        .bind(p.amount)
        .bind(p.method)
        .bind(p.status)
        .bind(p.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_payment(&self, id: Uuid) -> AppResult<Option<Payment>> {
        let p = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(p)
    }

    async fn first_payment_for(&self, reservation_id: Uuid) -> AppResult<Option<Payment>> {
        let p = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE reservation_id = $1 \
             ORDER BY created_at LIMIT 1"
        ))
        .bind(reservation_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(p)
    }

    async fn set_payment_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
    ) -> AppResult<Option<Payment>> {
        let p = sqlx::query_as::<_, Payment>(&format!(
            "UPDATE payments SET status = $2 WHERE id = $1 RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(p)
    }
}
