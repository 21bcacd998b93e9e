//! Pet domain model and schema registry.
//!
//! # Responsibility
//! - Define table/column names, content authority and MIME descriptors.
//! - Define the `Gender` enum and its validity predicate.
//! - Validate field values before they reach SQL.
//!
//! # Invariants
//! - `id` is assigned by the store and never appears in a write values map.
//! - `gender` is one of `0|1|2`; this is enforced here, not by SQLite.
//! - `name` is non-empty on create; `weight` is never negative.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier.
pub type PetId = i64;

/// Default content authority of the pets provider.
pub const CONTENT_AUTHORITY: &str = "com.example.android.pets";
/// URI scheme accepted in front of the authority.
pub const CONTENT_SCHEME: &str = "content";
/// Path segment addressing the pets collection.
pub const PATH_PETS: &str = "pets";

/// Name of the only table.
pub const TABLE_NAME: &str = "pets";

pub const COLUMN_ID: &str = "id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_BREED: &str = "breed";
pub const COLUMN_GENDER: &str = "gender";
pub const COLUMN_WEIGHT: &str = "weight";

/// All columns in schema order. Used when a query projection is empty.
pub const ALL_COLUMNS: &[&str] = &[
    COLUMN_ID,
    COLUMN_NAME,
    COLUMN_BREED,
    COLUMN_GENDER,
    COLUMN_WEIGHT,
];

const CURSOR_DIR_BASE_TYPE: &str = "vnd.cursor.dir";
const CURSOR_ITEM_BASE_TYPE: &str = "vnd.cursor.item";

/// Returns whether `column` is part of the `pets` schema.
pub fn is_known_column(column: &str) -> bool {
    ALL_COLUMNS.contains(&column)
}

/// MIME descriptor for the whole collection under `authority`.
pub fn directory_mime_type(authority: &str) -> String {
    format!("{CURSOR_DIR_BASE_TYPE}/{authority}/{PATH_PETS}")
}

/// MIME descriptor for a single pet under `authority`.
pub fn item_mime_type(authority: &str) -> String {
    format!("{CURSOR_ITEM_BASE_TYPE}/{authority}/{PATH_PETS}")
}

/// Gender of a pet, persisted as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Unknown,
    Male,
    Female,
}

impl Gender {
    pub fn to_db(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Male => 1,
            Self::Female => 2,
        }
    }

    pub fn from_db(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Male),
            2 => Some(Self::Female),
            _ => None,
        }
    }
}

/// Returns whether `value` is one of the persisted gender codes.
pub fn is_valid_gender(value: i64) -> bool {
    Gender::from_db(value).is_some()
}

/// Field-level validation failure for pet writes.
#[derive(Debug, Clone, PartialEq)]
pub enum PetValidationError {
    /// `name` missing, null, not text, or blank.
    NameRequired,
    /// `gender` missing or outside `0|1|2`. Carries the rejected value.
    InvalidGender(Option<Value>),
    /// `weight` null, not an integer, or negative.
    InvalidWeight(Value),
    /// Column is not part of the schema.
    UnknownColumn(String),
    /// `id` is store-assigned and cannot be written.
    ImmutableId,
}

impl PetValidationError {
    /// Column that caused the failure.
    pub fn field(&self) -> &str {
        match self {
            Self::NameRequired => COLUMN_NAME,
            Self::InvalidGender(_) => COLUMN_GENDER,
            Self::InvalidWeight(_) => COLUMN_WEIGHT,
            Self::UnknownColumn(column) => column.as_str(),
            Self::ImmutableId => COLUMN_ID,
        }
    }
}

impl Display for PetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "name required"),
            Self::InvalidGender(_) => write!(f, "invalid gender"),
            Self::InvalidWeight(_) => write!(f, "invalid weight"),
            Self::UnknownColumn(column) => write!(f, "unknown column `{column}`"),
            Self::ImmutableId => write!(f, "id is assigned by the store and cannot be written"),
        }
    }
}

impl Error for PetValidationError {}

/// Validates the name column value.
pub fn validate_name(value: Option<&Value>) -> Result<(), PetValidationError> {
    match value {
        Some(Value::Text(name)) if !name.trim().is_empty() => Ok(()),
        _ => Err(PetValidationError::NameRequired),
    }
}

/// Validates the gender column value.
pub fn validate_gender(value: Option<&Value>) -> Result<(), PetValidationError> {
    match value {
        Some(Value::Integer(code)) if is_valid_gender(*code) => Ok(()),
        other => Err(PetValidationError::InvalidGender(other.cloned())),
    }
}

/// Validates the weight column value. Absence is handled by the caller.
pub fn validate_weight(value: &Value) -> Result<(), PetValidationError> {
    match value {
        Value::Integer(weight) if *weight >= 0 => Ok(()),
        other => Err(PetValidationError::InvalidWeight(other.clone())),
    }
}

/// Typed read model of one `pets` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub breed: Option<String>,
    pub gender: Gender,
    pub weight: i64,
}

/// Write helper for creating a pet through the provider.
///
/// `weight = None` leaves the column out so the schema default applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetDraft {
    pub name: String,
    pub breed: Option<String>,
    pub gender: Gender,
    pub weight: Option<i64>,
}

impl PetDraft {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            name: name.into(),
            breed: None,
            gender,
            weight: None,
        }
    }

    pub fn with_breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    pub fn with_weight(mut self, weight: i64) -> Self {
        self.weight = Some(weight);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_codes_roundtrip_and_reject_unknown_values() {
        for gender in [Gender::Unknown, Gender::Male, Gender::Female] {
            assert_eq!(Gender::from_db(gender.to_db()), Some(gender));
        }
        assert!(!is_valid_gender(3));
        assert!(!is_valid_gender(-1));
    }

    #[test]
    fn name_validation_rejects_blank_and_non_text() {
        assert!(validate_name(Some(&Value::Text("Toto".to_string()))).is_ok());
        assert_eq!(
            validate_name(Some(&Value::Text("   ".to_string()))),
            Err(PetValidationError::NameRequired)
        );
        assert_eq!(
            validate_name(Some(&Value::Null)),
            Err(PetValidationError::NameRequired)
        );
        assert_eq!(validate_name(None), Err(PetValidationError::NameRequired));
    }

    #[test]
    fn weight_validation_rejects_negative_and_null() {
        assert!(validate_weight(&Value::Integer(0)).is_ok());
        let err = validate_weight(&Value::Integer(-2)).unwrap_err();
        assert_eq!(err.field(), COLUMN_WEIGHT);
        assert_eq!(err.to_string(), "invalid weight");
        assert!(validate_weight(&Value::Null).is_err());
    }

    #[test]
    fn mime_types_embed_authority_and_path() {
        assert_eq!(
            directory_mime_type(CONTENT_AUTHORITY),
            "vnd.cursor.dir/com.example.android.pets/pets"
        );
        assert_eq!(
            item_mime_type(CONTENT_AUTHORITY),
            "vnd.cursor.item/com.example.android.pets/pets"
        );
    }
}
