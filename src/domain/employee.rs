//! API caller identity behind the access gate.

use serde::Serialize;

/// An employee account that may call the API. The gate admits a caller only
/// when its token resolves to an active employee.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    pub username: String,
    pub is_active: bool,
}
