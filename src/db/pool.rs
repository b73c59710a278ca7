use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use crate::config::Config;

/// Build the shared connection pool from configuration. Pool sizing bounds
/// concurrency for every store operation; the handle is passed explicitly
/// into each store constructor.
pub async fn connect(config: &Config) -> Result<Pool<Postgres>, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .max_lifetime(config.db_max_lifetime)
        .connect(&config.database_url)
        .await
}
