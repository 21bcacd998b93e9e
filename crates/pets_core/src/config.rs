//! Provider configuration.
//!
//! # Responsibility
//! - Describe the authority the provider answers for and where its store lives.
//! - Deserialize from host-supplied settings with sensible defaults.
//!
//! # Invariants
//! - Missing fields fall back to `ProviderConfig::default()`.

use crate::db::{StoreLocation, DEFAULT_READ_POOL_SIZE};
use crate::model::pet::CONTENT_AUTHORITY;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// File name of the pets database inside an app data directory.
pub const DATABASE_NAME: &str = "shelter.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Authority segment identifiers must carry (or imply).
    pub authority: String,
    /// Backing store location.
    pub store: StoreLocation,
    /// How long a blocked write waits for the engine lock.
    pub busy_timeout_ms: u64,
    /// Query-only connections opened next to the writer for file stores.
    pub read_pool_size: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            authority: CONTENT_AUTHORITY.to_string(),
            store: StoreLocation::File(DATABASE_NAME.into()),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            read_pool_size: DEFAULT_READ_POOL_SIZE,
        }
    }
}

impl ProviderConfig {
    /// Stores `shelter.db` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            store: StoreLocation::File(dir.as_ref().join(DATABASE_NAME)),
            ..Self::default()
        }
    }

    /// Private in-memory store, mainly for tests and previews.
    pub fn in_memory() -> Self {
        Self {
            store: StoreLocation::Memory,
            ..Self::default()
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{ProviderConfig, DATABASE_NAME};
    use crate::db::{StoreLocation, DEFAULT_READ_POOL_SIZE};
    use std::path::Path;

    #[test]
    fn in_dir_places_database_file_inside_directory() {
        let config = ProviderConfig::in_dir("/data/pets");
        assert_eq!(
            config.store,
            StoreLocation::File(Path::new("/data/pets").join(DATABASE_NAME))
        );
        assert_eq!(config.authority, "com.example.android.pets");
    }
}
