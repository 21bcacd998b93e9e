//! Pet repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Translate projection/selection/values into SQL over the `pets` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate the values map before any SQL mutation.
//! - Column names interpolated into SQL are always schema columns.
//! - Caller selection clauses are bound with positional `?` arguments.

use crate::db::DbError;
use crate::model::pet::{
    is_known_column, Gender, Pet, PetId, PetValidationError, ALL_COLUMNS, COLUMN_BREED,
    COLUMN_GENDER, COLUMN_ID, COLUMN_NAME, COLUMN_WEIGHT, TABLE_NAME,
};
use crate::model::values::ContentValues;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for pet persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PetValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted pet data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<PetValidationError> for RepoError {
    fn from(value: PetValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row filter: optional SQL condition plus its positional arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub clause: Option<String>,
    pub args: Vec<Value>,
}

impl Selection {
    /// Matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches exactly the row with `id`.
    pub fn by_id(id: PetId) -> Self {
        Self {
            clause: Some(format!("{COLUMN_ID} = ?")),
            args: vec![Value::Integer(id)],
        }
    }

    /// Caller-supplied condition. A blank clause matches every row.
    pub fn new(clause: Option<&str>, args: &[Value]) -> Self {
        Self {
            clause: clause
                .map(str::trim)
                .filter(|clause| !clause.is_empty())
                .map(str::to_string),
            args: args.to_vec(),
        }
    }

    fn where_sql(&self) -> String {
        match &self.clause {
            Some(clause) => format!(" WHERE ({clause})"),
            None => String::new(),
        }
    }
}

/// Materialized query result: column names plus row values in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Repository interface for pet CRUD operations.
pub trait PetRepository {
    fn query_pets(
        &self,
        projection: &[&str],
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> RepoResult<RowSet>;
    fn insert_pet(&self, values: &ContentValues) -> RepoResult<PetId>;
    fn update_pets(&self, values: &ContentValues, selection: &Selection) -> RepoResult<usize>;
    fn delete_pets(&self, selection: &Selection) -> RepoResult<usize>;
}

/// SQLite-backed pet repository.
pub struct SqlitePetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePetRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Loads one typed pet by id.
    pub fn get_pet(&self, id: PetId) -> RepoResult<Option<Pet>> {
        let row_set = self.query_pets(&[], &Selection::by_id(id), None)?;
        row_set
            .rows
            .first()
            .map(|row| pet_from_row(&row_set.columns, row))
            .transpose()
    }
}

impl PetRepository for SqlitePetRepository<'_> {
    fn query_pets(
        &self,
        projection: &[&str],
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> RepoResult<RowSet> {
        let columns = projection_columns(projection)?;
        let mut sql = format!(
            "SELECT {} FROM {TABLE_NAME}{}",
            columns.join(", "),
            selection.where_sql()
        );
        if let Some(order) = sort_order.map(str::trim).filter(|order| !order.is_empty()) {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let column_names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut rows = stmt.query(params_from_iter(selection.args.iter()))?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let record = (0..column_names.len())
                .map(|index| row.get::<_, Value>(index))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            records.push(record);
        }

        Ok(RowSet {
            columns: column_names,
            rows: records,
        })
    }

    fn insert_pet(&self, values: &ContentValues) -> RepoResult<PetId> {
        values.validate_for_insert()?;

        let (columns, bind_values): (Vec<&str>, Vec<&Value>) = values.iter().unzip();
        let placeholders = vec!["?"; columns.len()].join(", ");
        self.conn.execute(
            &format!(
                "INSERT INTO {TABLE_NAME} ({}) VALUES ({placeholders});",
                columns.join(", ")
            ),
            params_from_iter(bind_values),
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_pets(&self, values: &ContentValues, selection: &Selection) -> RepoResult<usize> {
        values.validate_for_update()?;
        if values.is_empty() {
            return Ok(0);
        }

        let assignments = values
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let bind_values = values
            .iter()
            .map(|(_, value)| value)
            .chain(selection.args.iter());

        let changed = self.conn.execute(
            &format!(
                "UPDATE {TABLE_NAME} SET {assignments}{};",
                selection.where_sql()
            ),
            params_from_iter(bind_values),
        )?;
        Ok(changed)
    }

    fn delete_pets(&self, selection: &Selection) -> RepoResult<usize> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {TABLE_NAME}{};", selection.where_sql()),
            params_from_iter(selection.args.iter()),
        )?;
        Ok(changed)
    }
}

fn projection_columns<'a>(projection: &[&'a str]) -> RepoResult<Vec<&'a str>> {
    if projection.is_empty() {
        return Ok(ALL_COLUMNS.to_vec());
    }

    for column in projection {
        if !is_known_column(column) {
            return Err(PetValidationError::UnknownColumn((*column).to_string()).into());
        }
    }
    Ok(projection.to_vec())
}

/// Decodes one full-width row into a typed `Pet`.
///
/// Fails with `InvalidData` when a column is missing from the projection or
/// holds a value the schema does not allow.
pub fn pet_from_row(columns: &[String], row: &[Value]) -> RepoResult<Pet> {
    let id = match column_value(columns, row, COLUMN_ID)? {
        Value::Integer(id) => *id,
        other => return Err(invalid_value(COLUMN_ID, other)),
    };
    let name = match column_value(columns, row, COLUMN_NAME)? {
        Value::Text(name) => name.clone(),
        other => return Err(invalid_value(COLUMN_NAME, other)),
    };
    let breed = match column_value(columns, row, COLUMN_BREED)? {
        Value::Text(breed) => Some(breed.clone()),
        Value::Null => None,
        other => return Err(invalid_value(COLUMN_BREED, other)),
    };
    let gender = match column_value(columns, row, COLUMN_GENDER)? {
        other @ Value::Integer(code) => {
            Gender::from_db(*code).ok_or_else(|| invalid_value(COLUMN_GENDER, other))?
        }
        other => return Err(invalid_value(COLUMN_GENDER, other)),
    };
    let weight = match column_value(columns, row, COLUMN_WEIGHT)? {
        Value::Integer(weight) if *weight >= 0 => *weight,
        other => return Err(invalid_value(COLUMN_WEIGHT, other)),
    };

    Ok(Pet {
        id,
        name,
        breed,
        gender,
        weight,
    })
}

fn column_value<'r>(columns: &[String], row: &'r [Value], name: &str) -> RepoResult<&'r Value> {
    columns
        .iter()
        .position(|column| column == name)
        .and_then(|index| row.get(index))
        .ok_or_else(|| RepoError::InvalidData(format!("column `{name}` not in row")))
}

fn invalid_value(column: &str, value: &Value) -> RepoError {
    RepoError::InvalidData(format!("invalid value {value:?} in {TABLE_NAME}.{column}"))
}
