use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Aircraft, Flight};
use crate::error::AppResult;
use crate::store::PgStore;

/// Flights and the aircraft fleet.
#[async_trait]
pub trait FlightCatalog: Send + Sync {
    async fn find_flight(&self, id: Uuid) -> AppResult<Option<Flight>>;
    async fn list_flights(&self) -> AppResult<Vec<Flight>>;
    async fn insert_flight(&self, flight: &Flight) -> AppResult<()>;
    async fn save_flight(&self, flight: &Flight) -> AppResult<()>;
    async fn delete_flight(&self, id: Uuid) -> AppResult<bool>;

    async fn find_aircraft(&self, id: Uuid) -> AppResult<Option<Aircraft>>;
    async fn list_aircraft(&self) -> AppResult<Vec<Aircraft>>;
}

const FLIGHT_COLUMNS: &str = "id, flight_number, origin, destination, departure_time, \
     arrival_time, aircraft_id, crew, status, price, created_at";

#[async_trait]
impl FlightCatalog for PgStore {
    async fn find_flight(&self, id: Uuid) -> AppResult<Option<Flight>> {
        let flight = sqlx::query_as::<_, Flight>(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(flight)
    }

    async fn list_flights(&self) -> AppResult<Vec<Flight>> {
        let flights = sqlx::query_as::<_, Flight>(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights ORDER BY departure_time"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(flights)
    }

    async fn insert_flight(&self, f: &Flight) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO flights (id, flight_number, origin, destination, departure_time,
                                 arrival_time, aircraft_id, crew, status, price, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(f.id)
        .bind(&f.flight_number)
        .bind(&f.origin)
        .bind(&f.destination)
        .bind(f.departure_time)
        .bind(f.arrival_time)
        .bind(f.aircraft_id)
        .bind(&f.crew)
        .bind(f.status)
        .bind(f.price)
        .bind(f.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save_flight(&self, f: &Flight) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE flights
               SET flight_number = $2, origin = $3, destination = $4, departure_time = $5,
                   arrival_time = $6, aircraft_id = $7, crew = $8, status = $9, price = $10
             WHERE id = $1
            "#,
        )
        .bind(f.id)
        .bind(&f.flight_number)
        .bind(&f.origin)
        .bind(&f.destination)
        .bind(f.departure_time)
        .bind(f.arrival_time)
        .bind(f.aircraft_id)
        .bind(&f.crew)
        .bind(f.status)
        .bind(f.price)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_flight(&self, id: Uuid) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM flights WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn find_aircraft(&self, id: Uuid) -> AppResult<Option<Aircraft>> {
        let aircraft = sqlx::query_as::<_, Aircraft>(
            "SELECT id, model, total_seats, seat_map FROM aircraft WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(aircraft)
    }

    async fn list_aircraft(&self) -> AppResult<Vec<Aircraft>> {
        let aircraft = sqlx::query_as::<_, Aircraft>(
            "SELECT id, model, total_seats, seat_map FROM aircraft ORDER BY model",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(aircraft)
    }
}
