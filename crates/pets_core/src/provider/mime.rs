//! Content type resolution for matched resources.

use crate::model::pet::{directory_mime_type, item_mime_type};
use crate::provider::matcher::ResourceCode;

/// Shape of the records a resource denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Zero or more records.
    Directory,
    /// Exactly one record.
    Item,
}

impl ContentType {
    pub fn for_code(code: ResourceCode) -> Self {
        match code {
            ResourceCode::Collection => Self::Directory,
            ResourceCode::Item => Self::Item,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::Item => "item",
        }
    }

    /// Full MIME descriptor, e.g. `vnd.cursor.dir/<authority>/pets`.
    pub fn mime_type(self, authority: &str) -> String {
        match self {
            Self::Directory => directory_mime_type(authority),
            Self::Item => item_mime_type(authority),
        }
    }
}
