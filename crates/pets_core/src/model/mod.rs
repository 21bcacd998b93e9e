//! Pet domain model and schema constants.
//!
//! # Responsibility
//! - Define the single `pets` table shape and its field constraints.
//! - Keep column names in one place for SQL builders and callers.
//!
//! # Invariants
//! - Every persisted pet is identified by a store-assigned `PetId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod pet;
pub mod values;
