use sqlx::PgPool;

use crate::domain::employee::Employee;

pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        "SELECT id, username, is_active FROM employees WHERE api_token = $1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>("SELECT id, username, is_active FROM employees ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    username: &str,
    api_token: &str,
    is_active: bool,
) -> Result<Employee, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        "INSERT INTO employees (username, api_token, is_active)
         VALUES ($1, $2, $3)
         RETURNING id, username, is_active",
    )
    .bind(username)
    .bind(api_token)
    .bind(is_active)
    .fetch_one(pool)
    .await
}

pub async fn set_active(
    pool: &PgPool,
    username: &str,
    is_active: bool,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE employees SET is_active = $2 WHERE username = $1")
        .bind(username)
        .bind(is_active)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
