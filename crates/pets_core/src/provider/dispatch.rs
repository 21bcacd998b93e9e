//! URI-addressed CRUD dispatcher for the pets table.
//!
//! # Responsibility
//! - Classify identifiers through the matcher and route to repository calls.
//! - Rewrite item identifiers into an `id = ?` selection.
//! - Return new item identifiers, affected counts and row cursors.
//!
//! # Invariants
//! - For item identifiers the id in the identifier replaces any caller
//!   selection and arguments.
//! - Insert is only defined for the collection identifier.
//! - The dispatcher holds no row cache and takes no locks of its own.
//! - Queries go through the store's read path, mutations through its write path.

use crate::config::ProviderConfig;
use crate::db::StoreHandle;
use crate::model::pet::PetId;
use crate::model::values::ContentValues;
use crate::provider::cursor::{Cursor, QueryArgs};
use crate::provider::error::{ProviderError, ProviderResult};
use crate::provider::matcher::{pets_matcher, ResourceCode, UriMatcher};
use crate::provider::mime::ContentType;
use crate::provider::uri::ResourceUri;
use crate::repo::pet_repo::{PetRepository, Selection, SqlitePetRepository};
use log::{debug, info, warn};
use rusqlite::types::Value;
use std::time::Instant;

/// Content provider for pets: one immutable matcher plus one store handle.
#[derive(Debug)]
pub struct PetProvider {
    matcher: UriMatcher<ResourceCode>,
    store: StoreHandle,
}

impl PetProvider {
    /// Builds the provider from configuration. The store opens on first use.
    pub fn new(config: &ProviderConfig) -> Self {
        Self::with_matcher(
            pets_matcher(config.authority.as_str()),
            StoreHandle::with_busy_timeout(config.store.clone(), config.busy_timeout())
                .with_read_pool_size(config.read_pool_size),
        )
    }

    /// In-memory provider under the default authority.
    pub fn in_memory() -> Self {
        Self::new(&ProviderConfig::in_memory())
    }

    /// Builds the provider from an explicitly constructed matcher.
    pub fn with_matcher(matcher: UriMatcher<ResourceCode>, store: StoreHandle) -> Self {
        Self { matcher, store }
    }

    pub fn authority(&self) -> &str {
        self.matcher.authority()
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// `content://<authority>/pets`
    pub fn content_uri(&self) -> ResourceUri {
        ResourceUri::collection(self.authority())
    }

    /// Classifies `uri` without touching the store.
    pub fn match_uri(&self, uri: impl AsRef<str>) -> Option<ResourceCode> {
        self.matcher.match_uri(&ResourceUri::parse(uri.as_ref()))
    }

    /// Queries rows addressed by `uri`.
    ///
    /// An empty `projection` selects every column. For item identifiers
    /// `selection`/`selection_args` are ignored.
    ///
    /// # Errors
    /// - `InvalidResource` when `uri` matches no pattern.
    /// - `Validation` when `projection` names a column outside the schema.
    /// - `Storage` when SQLite rejects the statement.
    pub fn query(
        &self,
        uri: impl AsRef<str>,
        projection: &[&str],
        selection: Option<&str>,
        selection_args: &[Value],
        sort_order: Option<&str>,
    ) -> ProviderResult<Cursor> {
        let started_at = Instant::now();
        let (uri, code) = self.classify(uri.as_ref())?;
        let effective = self.selection_for(code, &uri, selection, selection_args)?;

        let row_set = {
            let conn = self.store.readable()?;
            SqlitePetRepository::new(&conn).query_pets(projection, &effective, sort_order)
        };
        let row_set = row_set.inspect_err(|err| {
            warn!(
                "event=pet_query module=provider status=error uri={} duration_ms={} error={}",
                uri,
                started_at.elapsed().as_millis(),
                err
            );
        })?;

        debug!(
            "event=pet_query module=provider status=ok uri={} rows={} duration_ms={}",
            uri,
            row_set.rows.len(),
            started_at.elapsed().as_millis()
        );

        let args = QueryArgs {
            projection: projection.iter().map(|column| (*column).to_string()).collect(),
            selection: selection.map(str::to_string),
            selection_args: selection_args.to_vec(),
            sort_order: sort_order.map(str::to_string),
        };
        Ok(Cursor::new(uri, args, row_set))
    }

    /// Inserts one pet and returns its item identifier.
    ///
    /// # Errors
    /// - `UnsupportedOperation` when `uri` is not the collection identifier,
    ///   including identifiers that match no pattern.
    /// - `Validation` when `values` break a field constraint; nothing is written.
    /// - `Storage` when SQLite rejects the row.
    pub fn insert(
        &self,
        uri: impl AsRef<str>,
        values: &ContentValues,
    ) -> ProviderResult<ResourceUri> {
        let started_at = Instant::now();
        let uri = ResourceUri::parse(uri.as_ref());
        if self.matcher.match_uri(&uri) != Some(ResourceCode::Collection) {
            return Err(unsupported("insert", &uri));
        }

        let inserted = {
            let conn = self.store.writable()?;
            SqlitePetRepository::new(&conn).insert_pet(values)
        };
        let id = inserted.inspect_err(|err| {
            warn!(
                "event=pet_insert module=provider status=error uri={} duration_ms={} error={}",
                uri,
                started_at.elapsed().as_millis(),
                err
            );
        })?;

        info!(
            "event=pet_insert module=provider status=ok id={} duration_ms={}",
            id,
            started_at.elapsed().as_millis()
        );
        Ok(uri.with_appended_id(id))
    }

    /// Updates the rows addressed by `uri` and returns how many changed.
    ///
    /// Only the columns present in `values` are validated and written.
    /// Zero affected rows is not an error.
    pub fn update(
        &self,
        uri: impl AsRef<str>,
        values: &ContentValues,
        selection: Option<&str>,
        selection_args: &[Value],
    ) -> ProviderResult<usize> {
        let started_at = Instant::now();
        let (uri, code) = self.classify(uri.as_ref())?;
        let effective = self.selection_for(code, &uri, selection, selection_args)?;

        let updated = {
            let conn = self.store.writable()?;
            SqlitePetRepository::new(&conn).update_pets(values, &effective)
        };
        let changed = updated.inspect_err(|err| {
            warn!(
                "event=pet_update module=provider status=error uri={} duration_ms={} error={}",
                uri,
                started_at.elapsed().as_millis(),
                err
            );
        })?;

        info!(
            "event=pet_update module=provider status=ok uri={} rows={} duration_ms={}",
            uri,
            changed,
            started_at.elapsed().as_millis()
        );
        Ok(changed)
    }

    /// Deletes the rows addressed by `uri` and returns how many were removed.
    ///
    /// Deleting an id that no longer exists returns `0`.
    pub fn delete(
        &self,
        uri: impl AsRef<str>,
        selection: Option<&str>,
        selection_args: &[Value],
    ) -> ProviderResult<usize> {
        let started_at = Instant::now();
        let (uri, code) = self.classify(uri.as_ref())?;
        let effective = self.selection_for(code, &uri, selection, selection_args)?;

        let deleted = {
            let conn = self.store.writable()?;
            SqlitePetRepository::new(&conn).delete_pets(&effective)
        };
        let removed = deleted.inspect_err(|err| {
            warn!(
                "event=pet_delete module=provider status=error uri={} duration_ms={} error={}",
                uri,
                started_at.elapsed().as_millis(),
                err
            );
        })?;

        info!(
            "event=pet_delete module=provider status=ok uri={} rows={} duration_ms={}",
            uri,
            removed,
            started_at.elapsed().as_millis()
        );
        Ok(removed)
    }

    /// Resolves whether `uri` denotes a directory of pets or a single pet.
    pub fn get_type(&self, uri: impl AsRef<str>) -> ProviderResult<ContentType> {
        let (_, code) = self.classify(uri.as_ref())?;
        Ok(ContentType::for_code(code))
    }

    /// Full MIME descriptor for `uri` under this provider's authority.
    pub fn mime_type(&self, uri: impl AsRef<str>) -> ProviderResult<String> {
        Ok(self.get_type(uri)?.mime_type(self.authority()))
    }

    fn classify(&self, raw: &str) -> ProviderResult<(ResourceUri, ResourceCode)> {
        let uri = ResourceUri::parse(raw);
        match self.matcher.match_uri(&uri) {
            Some(code) => Ok((uri, code)),
            None => {
                debug!("event=uri_match module=provider status=no_match uri={raw}");
                Err(ProviderError::InvalidResource(raw.to_string()))
            }
        }
    }

    fn selection_for(
        &self,
        code: ResourceCode,
        uri: &ResourceUri,
        selection: Option<&str>,
        selection_args: &[Value],
    ) -> ProviderResult<Selection> {
        match code {
            ResourceCode::Collection => Ok(Selection::new(selection, selection_args)),
            ResourceCode::Item => {
                let id: PetId = uri
                    .last_id()
                    .ok_or_else(|| ProviderError::InvalidResource(uri.to_string()))?;
                if selection.is_some() || !selection_args.is_empty() {
                    debug!(
                        "event=selection_override module=provider status=ok uri={} id={}",
                        uri, id
                    );
                }
                Ok(Selection::by_id(id))
            }
        }
    }
}

fn unsupported(operation: &'static str, uri: &ResourceUri) -> ProviderError {
    ProviderError::UnsupportedOperation {
        operation,
        uri: uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::PetProvider;
    use crate::model::values::ContentValues;
    use crate::provider::error::ProviderError;
    use crate::provider::matcher::ResourceCode;
    use rusqlite::types::Value;

    #[test]
    fn store_is_not_opened_by_matching_or_type_resolution() {
        let provider = PetProvider::in_memory();
        assert_eq!(provider.match_uri("pets/3"), Some(ResourceCode::Item));
        assert!(provider.get_type("pets").is_ok());
        assert!(!provider.store().is_open());
    }

    #[test]
    fn unroutable_insert_is_rejected_before_validation() {
        let provider = PetProvider::in_memory();
        let err = provider
            .insert("staff", &ContentValues::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::UnsupportedOperation { operation: "insert", uri } if uri == "staff"
        ));
        assert!(!provider.store().is_open());
    }

    #[test]
    fn unknown_uri_is_an_invalid_resource_for_delete() {
        let provider = PetProvider::in_memory();
        let err = provider.delete("pets/7/toys", None, &[]).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResource(uri) if uri == "pets/7/toys"));
        assert!(!provider.store().is_open());
    }

    #[test]
    fn item_selection_discards_caller_arguments() {
        let provider = PetProvider::in_memory();
        let uri = provider.content_uri().with_appended_id(4);
        let selection = provider
            .selection_for(
                ResourceCode::Item,
                &uri,
                Some("name = ?"),
                &[Value::Text("Toto".to_string())],
            )
            .unwrap();
        assert_eq!(selection.clause.as_deref(), Some("id = ?"));
        assert_eq!(selection.args, vec![Value::Integer(4)]);
    }
}
