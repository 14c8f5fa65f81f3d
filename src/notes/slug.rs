//! Note identifiers.
//!
//! A slug is the only user-controlled value that reaches the filesystem, so
//! it is restricted to ASCII letters, digits, `_` and `-` (1 to 64 chars).
//! That keeps every note file a direct child of the notes directory.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 64;

/// Reasons a string is not a valid slug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    #[error("slug is empty")]
    Empty,
    #[error("slug is longer than {MAX_SLUG_LEN} characters")]
    TooLong,
    #[error("slug contains invalid character {0:?}")]
    InvalidChar(char),
}

/// A validated note identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn parse(raw: &str) -> Result<Self, SlugError> {
        if raw.is_empty() {
            return Err(SlugError::Empty);
        }
        if let Some(c) = raw.chars().find(|c| !is_slug_char(*c)) {
            return Err(SlugError::InvalidChar(c));
        }
        // All chars are ASCII at this point, so bytes == chars.
        if raw.len() > MAX_SLUG_LEN {
            return Err(SlugError::TooLong);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the note inside the notes directory.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

impl FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
