use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::errors::AppError;

/// Canonical hyphenated UUID shape: 8-4-4-4-12 hex digits, either case,
/// no braces, no `urn:uuid:` prefix. Version and variant nibbles are not
/// checked, so any UUID-shaped string counts.
pub const UUID_SHAPE_PATTERN: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

static UUID_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(UUID_SHAPE_PATTERN).expect("UUID shape pattern is valid"));

/// What a lookup key most likely is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Matches [`UUID_SHAPE_PATTERN`]; treated as an `originalId` first.
    CrossLocaleId,
    /// Anything else; treated as a locale-scoped slug first.
    Slug,
}

/// Classifies a lookup key by shape alone.
pub fn classify_key(key: &str) -> KeyKind {
    if UUID_SHAPE.is_match(key) {
        KeyKind::CrossLocaleId
    } else {
        KeyKind::Slug
    }
}

pub fn is_uuid_shaped(key: &str) -> bool {
    classify_key(key) == KeyKind::CrossLocaleId
}

/// Parses a contact-message id from a path segment.
pub fn valid_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::InvalidInput("Invalid UUID format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_cross_locale() {
        let id = Uuid::new_v4().to_string();
        assert_eq!(classify_key(&id), KeyKind::CrossLocaleId);
        assert_eq!(classify_key(&id.to_uppercase()), KeyKind::CrossLocaleId);
    }

    #[test]
    fn version_nibble_is_not_checked() {
        assert!(is_uuid_shaped("00000000-0000-0000-0000-000000000000"));
        assert!(is_uuid_shaped("abcdefab-cdef-ffff-0000-123456789abc"));
    }

    #[test]
    fn near_misses_are_slugs() {
        for key in [
            "vazo-1",
            "",
            "550e8400e29b41d4a716446655440000",
            "{550e8400-e29b-41d4-a716-446655440000}",
            "urn:uuid:550e8400-e29b-41d4-a716-446655440000",
            "550e8400-e29b-41d4-a716-44665544000",
            "550e8400-e29b-41d4-a716-4466554400000",
            "550e8400-e29b-41d4-a716-44665544000g",
            " 550e8400-e29b-41d4-a716-446655440000",
        ] {
            assert_eq!(classify_key(key), KeyKind::Slug, "key {key:?}");
        }
    }

    #[test]
    fn contact_ids_must_parse_as_uuids() {
        assert!(valid_uuid("vazo-1").is_err());
        assert!(valid_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
    }
}
