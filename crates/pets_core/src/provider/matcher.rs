//! Structural URI matcher.
//!
//! # Responsibility
//! - Hold an ordered list of `(path pattern, code)` registrations.
//! - Classify a `ResourceUri` into a registered code or no match.
//!
//! # Invariants
//! - Registrations are fixed once the matcher is built; matching never mutates.
//! - `#` matches a non-negative integer segment, `*` any single segment.
//! - The most specific matching pattern wins; ties go to the earliest one.

use crate::model::pet::{CONTENT_SCHEME, PATH_PETS};
use crate::provider::uri::{parse_id_segment, ResourceUri};

/// Match code for the pets provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceCode {
    /// `<authority>/pets`
    Collection,
    /// `<authority>/pets/#`
    Item,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternSegment {
    Literal(String),
    Number,
    Text,
}

impl PatternSegment {
    fn parse(segment: &str) -> Self {
        match segment {
            "#" => Self::Number,
            "*" => Self::Text,
            literal => Self::Literal(literal.to_string()),
        }
    }

    fn matches(&self, segment: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == segment,
            Self::Number => parse_id_segment(segment).is_some(),
            Self::Text => true,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Literal(_) => 2,
            Self::Number => 1,
            Self::Text => 0,
        }
    }
}

#[derive(Debug, Clone)]
struct Registration<C> {
    segments: Vec<PatternSegment>,
    code: C,
}

/// Immutable pattern registry for one authority.
#[derive(Debug, Clone)]
pub struct UriMatcher<C> {
    authority: String,
    registrations: Vec<Registration<C>>,
}

impl<C: Copy> UriMatcher<C> {
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            registrations: Vec::new(),
        }
    }

    /// Registers `path` (e.g. `pets/#`) for `code`, consuming the builder.
    pub fn with_path(mut self, path: &str, code: C) -> Self {
        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(PatternSegment::parse)
            .collect();
        self.registrations.push(Registration { segments, code });
        self
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Returns the code of the best matching registration, or `None`.
    ///
    /// A relative identifier is matched as a path first; only when that
    /// fails and its first segment equals the authority is the remainder
    /// tried as the path.
    pub fn match_uri(&self, uri: &ResourceUri) -> Option<C> {
        if let Some(scheme) = uri.scheme() {
            if scheme != CONTENT_SCHEME {
                return None;
            }
        }

        let segments = uri.path_segments();
        match uri.authority() {
            Some(authority) if authority == self.authority => self.best_match(segments),
            Some(_) => None,
            None => self.best_match(segments).or_else(|| match segments.split_first() {
                Some((first, rest)) if *first == self.authority => self.best_match(rest),
                _ => None,
            }),
        }
    }

    fn best_match(&self, path: &[String]) -> Option<C> {
        let mut best: Option<(Vec<u8>, C)> = None;
        for registration in &self.registrations {
            if registration.segments.len() != path.len() {
                continue;
            }
            let matched = registration
                .segments
                .iter()
                .zip(path)
                .all(|(pattern, segment)| pattern.matches(segment));
            if !matched {
                continue;
            }

            let ranks: Vec<u8> = registration.segments.iter().map(PatternSegment::rank).collect();
            let more_specific = best
                .as_ref()
                .map_or(true, |(best_ranks, _)| ranks > *best_ranks);
            if more_specific {
                best = Some((ranks, registration.code));
            }
        }

        best.map(|(_, code)| code)
    }
}

/// Builds the matcher for the pets provider under `authority`.
pub fn pets_matcher(authority: impl Into<String>) -> UriMatcher<ResourceCode> {
    UriMatcher::new(authority)
        .with_path(PATH_PETS, ResourceCode::Collection)
        .with_path(&format!("{PATH_PETS}/#"), ResourceCode::Item)
}

#[cfg(test)]
mod tests {
    use super::{pets_matcher, ResourceCode, UriMatcher};
    use crate::model::pet::CONTENT_AUTHORITY;
    use crate::provider::uri::ResourceUri;

    fn classify(input: &str) -> Option<ResourceCode> {
        pets_matcher(CONTENT_AUTHORITY).match_uri(&ResourceUri::parse(input))
    }

    #[test]
    fn collection_and_item_shapes_match() {
        assert_eq!(classify("pets"), Some(ResourceCode::Collection));
        assert_eq!(classify("pets/"), Some(ResourceCode::Collection));
        assert_eq!(classify("pets/0"), Some(ResourceCode::Item));
        assert_eq!(classify("pets/7"), Some(ResourceCode::Item));
        assert_eq!(
            classify("content://com.example.android.pets/pets/12"),
            Some(ResourceCode::Item)
        );
        assert_eq!(
            classify("com.example.android.pets/pets"),
            Some(ResourceCode::Collection)
        );
    }

    #[test]
    fn other_shapes_fall_through_to_no_match() {
        for input in [
            "",
            "staff",
            "pets/abc",
            "pets/-3",
            "pets/7/toys",
            "content://com.example.android.pets",
            "content://other.authority/pets",
            "https://com.example.android.pets/pets",
        ] {
            assert_eq!(classify(input), None, "input `{input}` should not match");
        }
    }

    #[test]
    fn literal_segment_beats_wildcard_regardless_of_order() {
        let matcher = UriMatcher::new("auth")
            .with_path("pets/*", 1)
            .with_path("pets/#", 2)
            .with_path("pets/count", 3);

        assert_eq!(matcher.match_uri(&ResourceUri::parse("pets/count")), Some(3));
        assert_eq!(matcher.match_uri(&ResourceUri::parse("pets/9")), Some(2));
        assert_eq!(matcher.match_uri(&ResourceUri::parse("pets/rex")), Some(1));
    }

    #[test]
    fn authority_equal_to_path_segment_still_routes_relative_identifiers() {
        let matcher = pets_matcher("pets");
        let route = |input: &str| matcher.match_uri(&ResourceUri::parse(input));

        assert_eq!(route("pets"), Some(ResourceCode::Collection));
        assert_eq!(route("pets/7"), Some(ResourceCode::Item));
        assert_eq!(route("pets/pets"), Some(ResourceCode::Collection));
        assert_eq!(route("pets/pets/7"), Some(ResourceCode::Item));
        assert_eq!(route("content://pets/pets"), Some(ResourceCode::Collection));
        assert_eq!(route("content://pets"), None);
    }

    #[test]
    fn equal_specificity_resolves_to_first_registration() {
        let matcher = UriMatcher::new("auth")
            .with_path("pets/#", 1)
            .with_path("pets/#", 2);
        assert_eq!(matcher.match_uri(&ResourceUri::parse("pets/4")), Some(1));
    }
}
