//! Network node persistence, including the supplier-graph snapshot the
//! hierarchy validator walks over.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, PgPool, QueryBuilder, Row};

use crate::domain::contact::Contact;
use crate::domain::hierarchy::SupplierEdges;
use crate::domain::node::{NetworkNode, NodeLevel};

const NODE_SELECT: &str = "SELECT n.id, n.name, n.supplier_id, n.level, n.debt, n.created_at, \
     c.id AS c_id, c.email, c.country, c.city, c.street, c.building_number \
     FROM network_nodes n JOIN contacts c ON c.id = n.contact_id";

fn row_to_node(row: &PgRow) -> Result<NetworkNode, sqlx::Error> {
    let level_code: i16 = row.try_get("level")?;
    let level = NodeLevel::from_code(level_code).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: "level".into(),
        source: format!("unknown node level code {level_code}").into(),
    })?;
    let debt: Decimal = row.try_get("debt")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(NetworkNode {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        contact: Contact {
            id: row.try_get("c_id")?,
            email: row.try_get("email")?,
            country: row.try_get("country")?,
            city: row.try_get("city")?,
            street: row.try_get("street")?,
            building_number: row.try_get("building_number")?,
        },
        supplier: row.try_get("supplier_id")?,
        level,
        debt,
        created_at,
    })
}

/// Snapshot of node id -> supplier id for the whole table.
pub async fn supplier_edges(executor: impl PgExecutor<'_>) -> Result<SupplierEdges, sqlx::Error> {
    let rows = sqlx::query("SELECT id, supplier_id FROM network_nodes")
        .fetch_all(executor)
        .await?;
    let mut edges = SupplierEdges::with_capacity(rows.len());
    for row in rows {
        edges.insert(row.try_get("id")?, row.try_get("supplier_id")?);
    }
    Ok(edges)
}

/// API listing, optionally filtered by exact contact id and/or the linked
/// contact's country.
pub async fn list(
    pool: &PgPool,
    contact: Option<i64>,
    country: Option<&str>,
) -> Result<Vec<NetworkNode>, sqlx::Error> {
    let mut qb = QueryBuilder::new(NODE_SELECT);
    let mut sep = " WHERE ";
    if let Some(contact_id) = contact {
        qb.push(sep).push("n.contact_id = ").push_bind(contact_id);
        sep = " AND ";
    }
    if let Some(country) = country {
        qb.push(sep).push("c.country = ").push_bind(country);
    }
    qb.push(" ORDER BY n.id");

    let rows = qb.build().fetch_all(pool).await?;
    rows.iter().map(row_to_node).collect()
}

/// Admin listing: free-text search over node name / contact city, plus exact
/// filters on the contact's country and city.
pub async fn admin_search(
    pool: &PgPool,
    term: Option<&str>,
    country: Option<&str>,
    city: Option<&str>,
) -> Result<Vec<NetworkNode>, sqlx::Error> {
    let mut qb = QueryBuilder::new(NODE_SELECT);
    let mut sep = " WHERE ";
    if let Some(term) = term {
        let pattern = format!("%{term}%");
        qb.push(sep)
            .push("(n.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.city ILIKE ")
            .push_bind(pattern)
            .push(")");
        sep = " AND ";
    }
    if let Some(country) = country {
        qb.push(sep).push("c.country = ").push_bind(country);
        sep = " AND ";
    }
    if let Some(city) = city {
        qb.push(sep).push("c.city = ").push_bind(city);
    }
    qb.push(" ORDER BY n.id");

    let rows = qb.build().fetch_all(pool).await?;
    rows.iter().map(row_to_node).collect()
}

pub async fn fetch(
    executor: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<NetworkNode>, sqlx::Error> {
    let sql = format!("{NODE_SELECT} WHERE n.id = $1");
    let row = sqlx::query(&sql).bind(id).fetch_optional(executor).await?;
    row.as_ref().map(row_to_node).transpose()
}

pub async fn exists(executor: impl PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM network_nodes WHERE id = $1)")
        .bind(id)
        .fetch_one(executor)
        .await
}

/// Inserts a node row. `debt` is never an input here; the column default
/// initializes it to 0.
pub async fn insert(
    executor: impl PgExecutor<'_>,
    name: &str,
    contact_id: i64,
    supplier_id: Option<i64>,
    level: NodeLevel,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO network_nodes (name, contact_id, supplier_id, level)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(name)
    .bind(contact_id)
    .bind(supplier_id)
    .bind(level.code())
    .fetch_one(executor)
    .await
}

/// Partial update of the node row. `supplier` distinguishes "leave unchanged"
/// (None) from "set" (Some), where the inner value may be an explicit NULL.
pub async fn update_fields(
    executor: impl PgExecutor<'_>,
    id: i64,
    name: Option<&str>,
    level: Option<NodeLevel>,
    supplier: Option<Option<i64>>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE network_nodes SET
            name = COALESCE($2, name),
            level = COALESCE($3, level),
            supplier_id = CASE WHEN $4 THEN $5 ELSE supplier_id END
         WHERE id = $1",
    )
    .bind(id)
    .bind(name)
    .bind(level.map(NodeLevel::code))
    .bind(supplier.is_some())
    .bind(supplier.flatten())
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn contact_id_of(
    executor: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT contact_id FROM network_nodes WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn delete(executor: impl PgExecutor<'_>, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM network_nodes WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Administrative bulk action: reset the debt of every targeted node to 0 in
/// one statement. No validation, no hierarchy re-check.
pub async fn clear_debt(pool: &PgPool, ids: &[i64]) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE network_nodes SET debt = 0 WHERE id = ANY($1)")
        .bind(ids)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
