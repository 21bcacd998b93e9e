//! Core data layer for the pets tracker.
//! URI routing, validation and SQLite persistence for the single `pets` table.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod provider;
pub mod repo;

pub use config::ProviderConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::pet::{Gender, Pet, PetDraft, PetId, PetValidationError};
pub use model::values::ContentValues;
pub use provider::cursor::{Cursor, CursorRow};
pub use provider::dispatch::PetProvider;
pub use provider::error::{ProviderError, ProviderResult};
pub use provider::matcher::{pets_matcher, ResourceCode, UriMatcher};
pub use provider::mime::ContentType;
pub use provider::uri::ResourceUri;
pub use repo::pet_repo::{PetRepository, RepoError, RepoResult, Selection, SqlitePetRepository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
