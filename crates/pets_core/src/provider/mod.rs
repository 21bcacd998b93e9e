//! URI-addressed content provider over the pets store.
//!
//! # Responsibility
//! - Parse and classify resource identifiers (`pets`, `pets/<id>`).
//! - Dispatch query/insert/update/delete to the repository layer.
//! - Resolve content types for matched identifiers.
//!
//! # Invariants
//! - Matching is structural over path segments, never a regex scan.
//! - The matcher is built once and passed into the provider explicitly.

pub mod cursor;
pub mod dispatch;
pub mod error;
pub mod matcher;
pub mod mime;
pub mod uri;
