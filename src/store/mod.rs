//! Backing stores. `PgStore` talks to Postgres; the test-only `MemoryStore`
//! keeps everything in process. Each feature module declares the trait it
//! needs and implements it for both.

#[cfg(test)]
pub mod memory;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

#[cfg(test)]
pub use memory::MemoryStore;

#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}
