pub mod models;
pub mod queries;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Read-only handle on the event warehouse.
///
/// Constructed once at startup, cloned into request state, closed on
/// shutdown. The service never writes through this pool.
#[derive(Clone)]
pub struct Warehouse {
    pool: PgPool,
}

impl Warehouse {
    /// Connect eagerly, verifying the warehouse is reachable.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Warehouse { pool })
    }

    /// Connect lazily; the first query establishes the connection.
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(database_url)?;
        Ok(Warehouse { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
