use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};

use crate::domain::product::Product;

const PRODUCT_SELECT: &str =
    "SELECT id, name, model, market_date, network_node_id AS network_node FROM products";

pub async fn list(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!("{PRODUCT_SELECT} ORDER BY id"))
        .fetch_all(pool)
        .await
}

/// Admin listing with an optional search over name / model.
pub async fn search(pool: &PgPool, term: Option<&str>) -> Result<Vec<Product>, sqlx::Error> {
    match term {
        Some(term) => {
            let pattern = format!("%{term}%");
            sqlx::query_as::<_, Product>(&format!(
                "{PRODUCT_SELECT} WHERE name ILIKE $1 OR model ILIKE $1 ORDER BY id"
            ))
            .bind(pattern)
            .fetch_all(pool)
            .await
        }
        None => list(pool).await,
    }
}

pub async fn fetch(
    executor: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!("{PRODUCT_SELECT} WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn insert(
    executor: impl PgExecutor<'_>,
    name: &str,
    model: &str,
    market_date: NaiveDate,
    network_node: i64,
) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "INSERT INTO products (name, model, market_date, network_node_id)
         VALUES ($1, $2, $3, $4)
         RETURNING id, name, model, market_date, network_node_id AS network_node",
    )
    .bind(name)
    .bind(model)
    .bind(market_date)
    .bind(network_node)
    .fetch_one(executor)
    .await
}

/// Partial update; absent fields are left unchanged.
pub async fn update_fields(
    executor: impl PgExecutor<'_>,
    id: i64,
    name: Option<&str>,
    model: Option<&str>,
    market_date: Option<NaiveDate>,
    network_node: Option<i64>,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "UPDATE products SET
            name = COALESCE($2, name),
            model = COALESCE($3, model),
            market_date = COALESCE($4, market_date),
            network_node_id = COALESCE($5, network_node_id)
         WHERE id = $1
         RETURNING id, name, model, market_date, network_node_id AS network_node",
    )
    .bind(id)
    .bind(name)
    .bind(model)
    .bind(market_date)
    .bind(network_node)
    .fetch_optional(executor)
    .await
}

pub async fn delete(executor: impl PgExecutor<'_>, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
