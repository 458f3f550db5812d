//! Commit identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings. The all-zero id is the
//! null id, which git prints where a commit has no parent.
//!
//! ## Format
//!
//! - Full: 40 hex characters (e.g., "abc123...def")
//! - Short: First 7 characters (e.g., "abc123d")

use crate::artifacts::objects::{OBJECT_ID_LENGTH, SHORT_OBJECT_ID_LENGTH};
use crate::errors::{Error, Result};
use std::str::FromStr;

/// Commit identifier (SHA-1 hash)
///
/// Equality, ordering and hashing are those of the lowercase hex string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// # Arguments
    ///
    /// * `id` - 40-character hexadecimal string
    ///
    /// # Returns
    ///
    /// Validated ObjectId or `Error::Resolution` if the text cannot name an object.
    /// Hex digits are stored in lowercase, so spellings of one hash compare equal.
    pub fn try_parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.len() != OBJECT_ID_LENGTH {
            return Err(Error::Resolution(format!(
                "{id} (invalid object id length {})",
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Resolution(format!(
                "{id} (invalid object id characters)"
            )));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// The all-zero id
    pub fn null() -> Self {
        Self("0".repeat(OBJECT_ID_LENGTH))
    }

    pub fn is_null(&self) -> bool {
        self.0.bytes().all(|b| b == b'0')
    }

    /// Check whether a token looks like a full object id without allocating
    pub fn is_valid(id: &str) -> bool {
        id.len() == OBJECT_ID_LENGTH && id.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get abbreviated form of the object ID
    ///
    /// # Returns
    ///
    /// First 7 characters of the hash (standard Git abbreviation)
    pub fn to_short_oid(&self) -> &str {
        &self.0[..SHORT_OBJECT_ID_LENGTH]
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_parse(s)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_full_length_hex() {
        let oid = ObjectId::try_parse("2454ae89983a4496a445ce347d7a41c0bb0ea7ae").unwrap();
        assert_eq!(oid.as_ref(), "2454ae89983a4496a445ce347d7a41c0bb0ea7ae");
        assert_eq!(oid.to_short_oid(), "2454ae8");
    }

    #[test]
    fn rejects_abbreviated_ids() {
        let err = ObjectId::try_parse("abc").unwrap_err();
        assert!(matches!(err, Error::Resolution(_)));
    }

    #[test]
    fn rejects_non_hex_characters() {
        assert!(ObjectId::try_parse("z".repeat(OBJECT_ID_LENGTH)).is_err());
    }

    #[test]
    fn uppercase_spelling_names_the_same_object() {
        let upper = ObjectId::try_parse("2454AE89983A4496A445CE347D7A41C0BB0EA7AE").unwrap();
        let lower = ObjectId::try_parse("2454ae89983a4496a445ce347d7a41c0bb0ea7ae").unwrap();

        assert_eq!(upper, lower);
        assert_eq!(upper.as_ref(), "2454ae89983a4496a445ce347d7a41c0bb0ea7ae");
    }

    #[test]
    fn null_id_is_recognized() {
        assert!(ObjectId::null().is_null());
        assert!(
            !ObjectId::try_parse("33ebe7acec14b25c5f84f35a664803fcab2f7781")
                .unwrap()
                .is_null()
        );
    }

    proptest! {
        #[test]
        fn prop_any_hex_string_of_full_length_parses(id in "[0-9a-f]{40}") {
            let oid = ObjectId::try_parse(id.clone()).unwrap();
            prop_assert_eq!(oid.to_string(), id);
        }

        #[test]
        fn prop_wrong_length_is_rejected(id in "[0-9a-f]{1,39}") {
            prop_assert!(ObjectId::try_parse(id).is_err());
        }
    }
}
