use thiserror::Error;

/// Error surface shared by the services and the HTTP layer.
///
/// Validation and authorization failures are distinct kinds: a validation
/// failure names the rule that was broken and is rejected before any write,
/// while an authorization failure is rejected before any data access.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("account is inactive")]
    Forbidden,

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ServiceError::NotFound { entity, id }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Validation(msg.into())
    }
}
