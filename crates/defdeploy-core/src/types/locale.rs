//! Locale tags attached to deploy calls.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A locale tag such as `"en"` or `"da-DK"`.
///
/// The empty tag is the invariant (culture-neutral) locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// The invariant locale.
    pub fn invariant() -> Self {
        Self(String::new())
    }

    /// Create a locale from a tag. Surrounding whitespace is dropped.
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_string())
    }

    /// Whether this is the invariant locale.
    pub fn is_invariant(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invariant() {
            f.write_str("invariant")
        } else {
            f.write_str(&self.0)
        }
    }
}
