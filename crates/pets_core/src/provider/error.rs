//! Provider-level error taxonomy.
//!
//! # Invariants
//! - Every variant is terminal for the operation that raised it.
//! - `Validation` is raised before any store mutation is attempted.

use crate::model::pet::PetValidationError;
use crate::repo::pet_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug)]
pub enum ProviderError {
    /// Identifier matches no registered pattern.
    InvalidResource(String),
    /// Operation is not defined for the matched resource shape.
    UnsupportedOperation {
        operation: &'static str,
        uri: String,
    },
    /// A field value violates a domain constraint.
    Validation(PetValidationError),
    /// Underlying engine failure, surfaced unchanged.
    Storage(RepoError),
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidResource(uri) => write!(f, "unknown resource uri `{uri}`"),
            Self::UnsupportedOperation { operation, uri } => {
                write!(f, "{operation} is not supported for `{uri}`")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::InvalidResource(_) | Self::UnsupportedOperation { .. } => None,
        }
    }
}

impl From<PetValidationError> for ProviderError {
    fn from(value: PetValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ProviderError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

impl From<crate::db::DbError> for ProviderError {
    fn from(value: crate::db::DbError) -> Self {
        Self::Storage(RepoError::Db(value))
    }
}
