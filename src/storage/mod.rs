//! Postgres persistence. Plain sqlx queries, one logical operation per
//! transaction; cascade behavior lives in the foreign keys (see `schema`).

pub mod contacts;
pub mod employees;
pub mod nodes;
pub mod products;
pub mod schema;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::infra::config;

/// Connects to Postgres and provisions the schema.
pub async fn connect_pool() -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config::max_connections())
        .connect(&config::database_url())
        .await?;
    schema::ensure_schema(&pool).await?;
    Ok(pool)
}
