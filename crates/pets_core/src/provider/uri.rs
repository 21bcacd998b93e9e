//! Resource identifier parsing.
//!
//! Accepted shapes:
//! - `content://<authority>/<path...>`
//! - `<authority>/<path...>` or `<path...>` (authority implied)
//!
//! Query strings, fragments and empty path segments are ignored.

use crate::model::pet::{PetId, CONTENT_SCHEME, PATH_PETS};
use std::fmt::{Display, Formatter};

/// Structurally parsed resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUri {
    canonical: String,
    scheme: Option<String>,
    authority: Option<String>,
    segments: Vec<String>,
}

impl ResourceUri {
    /// Parses `input`. Never fails; shapes nothing is registered for are
    /// rejected later by the matcher.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let input = input
            .find(['?', '#'])
            .map_or(input, |index| &input[..index]);

        let (scheme, authority, path) = match input.split_once("://") {
            Some((scheme, rest)) => {
                let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
                (Some(scheme.to_string()), Some(authority.to_string()), path)
            }
            None => (None, None, input),
        };

        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Self::from_parts(scheme, authority, segments)
    }

    /// Content URI of the pets collection under `authority`.
    pub fn collection(authority: &str) -> Self {
        Self::from_parts(
            Some(CONTENT_SCHEME.to_string()),
            Some(authority.to_string()),
            vec![PATH_PETS.to_string()],
        )
    }

    fn from_parts(scheme: Option<String>, authority: Option<String>, segments: Vec<String>) -> Self {
        let path = segments.join("/");
        let canonical = match (&scheme, &authority) {
            (Some(scheme), Some(authority)) if path.is_empty() => format!("{scheme}://{authority}"),
            (Some(scheme), Some(authority)) => format!("{scheme}://{authority}/{path}"),
            _ => path,
        };
        Self {
            canonical,
            scheme,
            authority,
            segments,
        }
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    pub fn path_segments(&self) -> &[String] {
        &self.segments
    }

    /// Trailing segment parsed as a row id, if it is one.
    pub fn last_id(&self) -> Option<PetId> {
        self.segments
            .last()
            .and_then(|segment| parse_id_segment(segment))
    }

    /// Returns this identifier with `id` appended as a new path segment.
    pub fn with_appended_id(&self, id: PetId) -> Self {
        let mut segments = self.segments.clone();
        segments.push(id.to_string());
        Self::from_parts(self.scheme.clone(), self.authority.clone(), segments)
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

/// Parses a non-negative decimal id segment. Signs and whitespace are rejected.
pub fn parse_id_segment(segment: &str) -> Option<PetId> {
    if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    segment.parse::<PetId>().ok()
}

impl AsRef<str> for ResourceUri {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for ResourceUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_id_segment, ResourceUri};

    #[test]
    fn parses_full_content_uri() {
        let uri = ResourceUri::parse("content://com.example.android.pets/pets/42");
        assert_eq!(uri.scheme(), Some("content"));
        assert_eq!(uri.authority(), Some("com.example.android.pets"));
        assert_eq!(uri.path_segments(), ["pets", "42"]);
        assert_eq!(uri.last_id(), Some(42));
    }

    #[test]
    fn relative_identifier_drops_empty_segments_and_query() {
        let uri = ResourceUri::parse("pets//7/?sort=name#top");
        assert_eq!(uri.authority(), None);
        assert_eq!(uri.path_segments(), ["pets", "7"]);
        assert_eq!(uri.as_str(), "pets/7");
    }

    #[test]
    fn id_segment_rejects_signs_and_overflow() {
        assert_eq!(parse_id_segment("0"), Some(0));
        assert_eq!(parse_id_segment("-1"), None);
        assert_eq!(parse_id_segment("+1"), None);
        assert_eq!(parse_id_segment("7a"), None);
        assert_eq!(parse_id_segment("99999999999999999999"), None);
    }

    #[test]
    fn appended_id_extends_collection_uri() {
        let item = ResourceUri::collection("com.example.android.pets").with_appended_id(5);
        assert_eq!(item.to_string(), "content://com.example.android.pets/pets/5");
        assert_eq!(item.last_id(), Some(5));
    }
}
