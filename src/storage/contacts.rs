use sqlx::{PgExecutor, PgPool};

use crate::domain::contact::{Contact, ContactInput, ContactPatch};

pub async fn insert(
    executor: impl PgExecutor<'_>,
    input: &ContactInput,
) -> Result<Contact, sqlx::Error> {
    sqlx::query_as::<_, Contact>(
        "INSERT INTO contacts (email, country, city, street, building_number)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, email, country, city, street, building_number",
    )
    .bind(&input.email)
    .bind(&input.country)
    .bind(&input.city)
    .bind(&input.street)
    .bind(&input.building_number)
    .fetch_one(executor)
    .await
}

/// Overwrites the fields present in the patch, leaving the rest untouched.
pub async fn update_fields(
    executor: impl PgExecutor<'_>,
    id: i64,
    patch: &ContactPatch,
) -> Result<Option<Contact>, sqlx::Error> {
    sqlx::query_as::<_, Contact>(
        "UPDATE contacts SET
            email = COALESCE($2, email),
            country = COALESCE($3, country),
            city = COALESCE($4, city),
            street = COALESCE($5, street),
            building_number = COALESCE($6, building_number)
         WHERE id = $1
         RETURNING id, email, country, city, street, building_number",
    )
    .bind(id)
    .bind(patch.email.as_deref())
    .bind(patch.country.as_deref())
    .bind(patch.city.as_deref())
    .bind(patch.street.as_deref())
    .bind(patch.building_number.as_deref())
    .fetch_optional(executor)
    .await
}

pub async fn delete(executor: impl PgExecutor<'_>, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Admin listing with an optional search over email / country / city.
pub async fn search(pool: &PgPool, term: Option<&str>) -> Result<Vec<Contact>, sqlx::Error> {
    match term {
        Some(term) => {
            let pattern = format!("%{term}%");
            sqlx::query_as::<_, Contact>(
                "SELECT id, email, country, city, street, building_number FROM contacts
                 WHERE email ILIKE $1 OR country ILIKE $1 OR city ILIKE $1
                 ORDER BY id",
            )
            .bind(pattern)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Contact>(
                "SELECT id, email, country, city, street, building_number FROM contacts
                 ORDER BY id",
            )
            .fetch_all(pool)
            .await
        }
    }
}
