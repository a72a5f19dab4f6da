//! Idempotent schema provisioning, run once at startup.
//!
//! Referential behavior is encoded in the foreign keys:
//! - `products.network_node_id` cascades on node delete;
//! - `network_nodes.supplier_id` is cleared (SET NULL) when the supplier is
//!   deleted, dependents are never cascaded;
//! - the owned contact row is removed by the delete transaction itself, since
//!   the node is the owning side of the one-to-one link.

use sqlx::PgPool;

pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS contacts (
            id BIGSERIAL PRIMARY KEY,
            email TEXT NOT NULL,
            country VARCHAR(60) NOT NULL,
            city VARCHAR(60) NOT NULL,
            street VARCHAR(60) NOT NULL,
            building_number VARCHAR(30) NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS network_nodes (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            contact_id BIGINT NOT NULL UNIQUE REFERENCES contacts(id),
            supplier_id BIGINT REFERENCES network_nodes(id) ON DELETE SET NULL,
            level SMALLINT NOT NULL,
            debt NUMERIC(16, 2) NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(256) NOT NULL,
            model VARCHAR(256) NOT NULL,
            market_date DATE NOT NULL,
            network_node_id BIGINT NOT NULL REFERENCES network_nodes(id) ON DELETE CASCADE
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS products_network_node_id_idx
         ON products (network_node_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS employees (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            api_token TEXT NOT NULL UNIQUE,
            is_active BOOLEAN NOT NULL DEFAULT TRUE
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
