//! Products sold through the network.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::error::ServiceError;

pub const MAX_NAME_LEN: usize = 256;
pub const MAX_MODEL_LEN: usize = 256;

/// A stored product. Deleted together with its owning node.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub model: String,
    pub market_date: NaiveDate,
    pub network_node: i64,
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), ServiceError> {
    if value.is_empty() {
        return Err(ServiceError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max {
        return Err(ServiceError::validation(format!(
            "{field} may not exceed {max} characters"
        )));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ServiceError> {
    check_len("name", name, MAX_NAME_LEN)
}

pub fn validate_model(model: &str) -> Result<(), ServiceError> {
    check_len("model", model, MAX_MODEL_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_lengths_are_capped() {
        assert!(validate_name("4K OLED TV").is_ok());
        assert!(validate_name(&"n".repeat(MAX_NAME_LEN + 1)).is_err());
        assert!(validate_model(&"m".repeat(MAX_MODEL_LEN + 1)).is_err());
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(validate_name("").is_err());
        assert!(validate_model("").is_err());
    }
}
