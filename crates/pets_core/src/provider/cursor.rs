//! Query result rows.
//!
//! # Invariants
//! - A cursor is a snapshot: later writes never change its rows.
//! - `notification_uri` is the identifier the cursor was queried with, so an
//!   external change observer can mark it stale.

use crate::model::pet::Pet;
use crate::provider::dispatch::PetProvider;
use crate::provider::error::ProviderResult;
use crate::provider::uri::ResourceUri;
use crate::repo::pet_repo::{pet_from_row, RowSet};
use rusqlite::types::Value;

/// Arguments a cursor was produced with, kept for `requery`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct QueryArgs {
    pub projection: Vec<String>,
    pub selection: Option<String>,
    pub selection_args: Vec<Value>,
    pub sort_order: Option<String>,
}

/// Finite, restartable row sequence returned by `PetProvider::query`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    notification_uri: ResourceUri,
    args: QueryArgs,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Cursor {
    pub(crate) fn new(notification_uri: ResourceUri, args: QueryArgs, row_set: RowSet) -> Self {
        Self {
            notification_uri,
            args,
            columns: row_set.columns,
            rows: row_set.rows,
        }
    }

    pub fn notification_uri(&self) -> &ResourceUri {
        &self.notification_uri
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<CursorRow<'_>> {
        self.rows.get(index).map(|values| CursorRow {
            columns: &self.columns,
            values,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = CursorRow<'_>> + '_ {
        self.rows.iter().map(|values| CursorRow {
            columns: &self.columns,
            values,
        })
    }

    /// Decodes every row into a typed `Pet`.
    ///
    /// Requires a projection that includes all columns.
    pub fn to_pets(&self) -> ProviderResult<Vec<Pet>> {
        self.rows
            .iter()
            .map(|row| pet_from_row(&self.columns, row).map_err(Into::into))
            .collect()
    }

    /// Runs the same query again against `provider` and returns fresh rows.
    pub fn requery(&self, provider: &PetProvider) -> ProviderResult<Cursor> {
        let projection: Vec<&str> = self.args.projection.iter().map(String::as_str).collect();
        provider.query(
            &self.notification_uri,
            &projection,
            self.args.selection.as_deref(),
            &self.args.selection_args,
            self.args.sort_order.as_deref(),
        )
    }
}

/// Borrowed view of one cursor row.
#[derive(Debug, Clone, Copy)]
pub struct CursorRow<'c> {
    columns: &'c [String],
    values: &'c [Value],
}

impl<'c> CursorRow<'c> {
    pub fn get(&self, column: &str) -> Option<&'c Value> {
        self.columns
            .iter()
            .position(|name| name == column)
            .and_then(|index| self.values.get(index))
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        match self.get(column)? {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_str(&self, column: &str) -> Option<&'c str> {
        match self.get(column)? {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self, column: &str) -> bool {
        matches!(self.get(column), Some(Value::Null))
    }
}
