//! Column/value map used by insert and update.
//!
//! # Responsibility
//! - Carry caller-supplied column values to the write paths.
//! - Validate a values map against the `pets` schema before any SQL runs.
//!
//! # Invariants
//! - Validation never touches the store.
//! - Insert validation requires `name` and `gender`; update validation only
//!   checks the columns that are present.

use crate::model::pet::{
    is_known_column, validate_gender, validate_name, validate_weight, PetDraft,
    PetValidationError, COLUMN_BREED, COLUMN_GENDER, COLUMN_ID, COLUMN_NAME, COLUMN_WEIGHT,
};
use rusqlite::types::Value;
use std::collections::BTreeMap;

/// Ordered column -> value map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentValues {
    entries: BTreeMap<String, Value>,
}

impl ContentValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `column` to `value`, replacing any previous value.
    pub fn put(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(column.into(), value.into());
        self
    }

    /// Builder form of [`ContentValues::put`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.put(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.entries.remove(column)
    }

    pub fn contains_key(&self, column: &str) -> bool {
        self.entries.contains_key(column)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(column, value)| (column.as_str(), value))
    }

    /// Checks the full-row constraints required to create a pet.
    ///
    /// # Errors
    /// - `ImmutableId` / `UnknownColumn` for columns that cannot be written.
    /// - `NameRequired` when `name` is missing or blank.
    /// - `InvalidGender` when `gender` is missing or outside the enum.
    /// - `InvalidWeight` when `weight` is present but not a non-negative integer.
    pub fn validate_for_insert(&self) -> Result<(), PetValidationError> {
        self.validate_columns()?;
        validate_name(self.get(COLUMN_NAME))?;
        validate_gender(self.get(COLUMN_GENDER))?;
        if let Some(weight) = self.get(COLUMN_WEIGHT) {
            validate_weight(weight)?;
        }
        Ok(())
    }

    /// Checks only the columns present, for partial updates.
    pub fn validate_for_update(&self) -> Result<(), PetValidationError> {
        self.validate_columns()?;
        if self.contains_key(COLUMN_NAME) {
            validate_name(self.get(COLUMN_NAME))?;
        }
        if self.contains_key(COLUMN_GENDER) {
            validate_gender(self.get(COLUMN_GENDER))?;
        }
        if let Some(weight) = self.get(COLUMN_WEIGHT) {
            validate_weight(weight)?;
        }
        Ok(())
    }

    fn validate_columns(&self) -> Result<(), PetValidationError> {
        for column in self.entries.keys() {
            if column == COLUMN_ID {
                return Err(PetValidationError::ImmutableId);
            }
            if !is_known_column(column) {
                return Err(PetValidationError::UnknownColumn(column.clone()));
            }
        }
        Ok(())
    }
}

impl From<&PetDraft> for ContentValues {
    fn from(draft: &PetDraft) -> Self {
        let mut values = ContentValues::new();
        values.put(COLUMN_NAME, draft.name.clone());
        values.put(COLUMN_GENDER, draft.gender.to_db());
        if let Some(breed) = &draft.breed {
            values.put(COLUMN_BREED, breed.clone());
        }
        if let Some(weight) = draft.weight {
            values.put(COLUMN_WEIGHT, weight);
        }
        values
    }
}

impl From<PetDraft> for ContentValues {
    fn from(draft: PetDraft) -> Self {
        Self::from(&draft)
    }
}

#[cfg(test)]
mod tests {
    use super::ContentValues;
    use crate::model::pet::{Gender, PetDraft, PetValidationError};
    use rusqlite::types::Value;

    fn toto() -> ContentValues {
        ContentValues::new()
            .with("name", "Toto".to_string())
            .with("breed", "Terrier".to_string())
            .with("gender", 1)
            .with("weight", 7)
    }

    #[test]
    fn insert_validation_accepts_complete_row_and_missing_weight() {
        assert!(toto().validate_for_insert().is_ok());

        let mut without_weight = toto();
        without_weight.remove("weight");
        assert!(without_weight.validate_for_insert().is_ok());
    }

    #[test]
    fn insert_validation_requires_name_then_gender() {
        let mut values = toto();
        values.remove("name");
        values.remove("gender");
        assert_eq!(
            values.validate_for_insert(),
            Err(PetValidationError::NameRequired)
        );

        values.put("name", "Toto".to_string());
        assert_eq!(
            values.validate_for_insert(),
            Err(PetValidationError::InvalidGender(None))
        );

        values.put("gender", 7);
        assert_eq!(
            values.validate_for_insert(),
            Err(PetValidationError::InvalidGender(Some(Value::Integer(7))))
        );
    }

    #[test]
    fn id_and_unknown_columns_are_rejected() {
        assert_eq!(
            toto().with("id", 3).validate_for_insert(),
            Err(PetValidationError::ImmutableId)
        );
        assert_eq!(
            ContentValues::new()
                .with("owner", "Dorothy".to_string())
                .validate_for_update(),
            Err(PetValidationError::UnknownColumn("owner".to_string()))
        );
    }

    #[test]
    fn update_validation_only_checks_present_columns() {
        let weight_only = ContentValues::new().with("weight", 12);
        assert!(weight_only.validate_for_update().is_ok());

        let blank_name = ContentValues::new().with("name", String::new());
        assert_eq!(
            blank_name.validate_for_update(),
            Err(PetValidationError::NameRequired)
        );

        let null_breed = ContentValues::new().with("breed", Value::Null);
        assert!(null_breed.validate_for_update().is_ok());
    }

    #[test]
    fn draft_conversion_omits_unset_optional_columns() {
        let values = ContentValues::from(PetDraft::new("Binx", Gender::Female));
        assert_eq!(values.len(), 2);
        assert_eq!(values.get("gender"), Some(&Value::Integer(2)));
        assert!(!values.contains_key("weight"));
    }
}
