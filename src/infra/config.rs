//! Centralized configuration (environment variables + defaults).

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set")
}

/// Address the API server binds to.
pub fn bind_addr() -> String {
    std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}

/// Maximum size of the Postgres connection pool.
pub fn max_connections() -> u32 {
    std::env::var("MAX_DB_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(5)
        .max(1)
}
