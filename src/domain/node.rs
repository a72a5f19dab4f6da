//! Network nodes: participants in the distribution hierarchy.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::contact::Contact;
use crate::domain::error::ServiceError;

pub const MAX_NAME_LEN: usize = 255;

/// Position of a node in the distribution chain.
///
/// Stored as a small integer code (factory = 0, retail network = 1,
/// sole proprietor = 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeLevel {
    Factory,
    RetailNetwork,
    SoleProprietor,
}

impl NodeLevel {
    pub fn code(self) -> i16 {
        match self {
            NodeLevel::Factory => 0,
            NodeLevel::RetailNetwork => 1,
            NodeLevel::SoleProprietor => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(NodeLevel::Factory),
            1 => Some(NodeLevel::RetailNetwork),
            2 => Some(NodeLevel::SoleProprietor),
            _ => None,
        }
    }
}

/// A stored network node with its owned contact attached.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NetworkNode {
    pub id: i64,
    pub name: String,
    pub contact: Contact,
    pub supplier: Option<i64>,
    pub level: NodeLevel,
    /// Monetary balance owed to the supplier. Read-only through the API;
    /// reset only by the administrative bulk action.
    #[schema(value_type = String)]
    pub debt: Decimal,
    pub created_at: DateTime<Utc>,
}

pub fn validate_name(name: &str) -> Result<(), ServiceError> {
    if name.is_empty() {
        return Err(ServiceError::validation("name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ServiceError::validation(format!(
            "name may not exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_codes_map_both_ways() {
        assert_eq!(NodeLevel::from_code(0), Some(NodeLevel::Factory));
        assert_eq!(NodeLevel::from_code(2), Some(NodeLevel::SoleProprietor));
        assert_eq!(NodeLevel::RetailNetwork.code(), 1);
        assert_eq!(NodeLevel::from_code(3), None);
    }

    #[test]
    fn name_length_is_capped() {
        assert!(validate_name("Electro Factory West").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"n".repeat(MAX_NAME_LEN + 1)).is_err());
    }
}
