//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for the `pets` table.
//! - Isolate SQLite query details from URI routing and dispatch.
//!
//! # Invariants
//! - Repository writes must validate the values map before persistence.
//! - Zero affected rows is a normal result, never an error.

pub mod pet_repo;
