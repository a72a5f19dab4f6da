//! Contact records owned by network nodes.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::error::ServiceError;

pub const MAX_COUNTRY_LEN: usize = 60;
pub const MAX_CITY_LEN: usize = 60;
pub const MAX_STREET_LEN: usize = 60;
pub const MAX_BUILDING_NUMBER_LEN: usize = 30;

/// A stored contact record. Owned by exactly one network node and deleted
/// together with it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Contact {
    pub id: i64,
    pub email: String,
    pub country: String,
    pub city: String,
    pub street: String,
    pub building_number: String,
}

/// Contact fields nested inside a node create request. All fields required.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactInput {
    pub email: String,
    pub country: String,
    pub city: String,
    pub street: String,
    pub building_number: String,
}

/// Contact fields nested inside a node update. Every key present overwrites
/// the corresponding attribute of the linked contact; absent keys are left
/// unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_number: Option<String>,
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"))
}

pub fn validate_email(email: &str) -> Result<(), ServiceError> {
    if email_regex().is_match(email) {
        Ok(())
    } else {
        Err(ServiceError::validation(format!(
            "'{email}' is not a valid email address"
        )))
    }
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

impl ContactInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        validate_email(&self.email)?;
        check_len("country", &self.country, MAX_COUNTRY_LEN)?;
        check_len("city", &self.city, MAX_CITY_LEN)?;
        check_len("street", &self.street, MAX_STREET_LEN)?;
        check_len("building_number", &self.building_number, MAX_BUILDING_NUMBER_LEN)?;
        Ok(())
    }
}

impl ContactPatch {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(country) = &self.country {
            check_len("country", country, MAX_COUNTRY_LEN)?;
        }
        if let Some(city) = &self.city {
            check_len("city", city, MAX_CITY_LEN)?;
        }
        if let Some(street) = &self.street {
            check_len("street", street, MAX_STREET_LEN)?;
        }
        if let Some(building_number) = &self.building_number {
            check_len("building_number", building_number, MAX_BUILDING_NUMBER_LEN)?;
        }
        Ok(())
    }

    /// True when no contact field is present in the patch.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.country.is_none()
            && self.city.is_none()
            && self.street.is_none()
            && self.building_number.is_none()
    }
}

impl From<ContactInput> for ContactPatch {
    fn from(input: ContactInput) -> Self {
        ContactPatch {
            email: Some(input.email),
            country: Some(input.country),
            city: Some(input.city),
            street: Some(input.street),
            building_number: Some(input.building_number),
        }
    }
}
