//! Tag filters selecting which entity categories to fetch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TagFilterError;

/// Label used for the unfiltered query and for entities grouped under it.
pub const RESERVED_ALL_LABEL: &str = "all";

/// Tag key used when a filter is given as a bare value (`"school"`).
pub const DEFAULT_TAG_KEY: &str = "amenity";

/// Characters that would break an Overpass QL tag selector.
const FORBIDDEN: &[char] = &['"', '[', ']', '\n', '\r', '\\'];

/// Which entities a fetch selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TagFilter {
    /// Every entity carrying the default tag key, whatever its value.
    AllAmenities,

    /// Entities whose `key` tag equals `value`.
    SingleTag { key: String, value: String },
}

impl TagFilter {
    /// Build a `key=value` filter, validating both parts.
    pub fn single(key: impl Into<String>, value: impl Into<String>) -> Result<Self, TagFilterError> {
        let key = key.into().trim().to_string();
        let value = value.into().trim().to_string();
        let input = format!("{}={}", key, value);

        if key.is_empty() {
            return Err(TagFilterError::EmptyKey(input));
        }
        if value.is_empty() {
            return Err(TagFilterError::EmptyValue(input));
        }
        if let Some(ch) = input.chars().find(|c| FORBIDDEN.contains(c)) {
            return Err(TagFilterError::ForbiddenChar { input, ch });
        }

        Ok(Self::SingleTag { key, value })
    }

    /// Shorthand for `amenity=<value>`.
    pub fn amenity(value: impl Into<String>) -> Result<Self, TagFilterError> {
        Self::single(DEFAULT_TAG_KEY, value)
    }

    /// Parse `"all"`, `"<value>"` or `"<key>=<value>"`.
    pub fn parse(input: &str) -> Result<Self, TagFilterError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(TagFilterError::Empty);
        }
        if input.eq_ignore_ascii_case(RESERVED_ALL_LABEL) {
            return Ok(Self::AllAmenities);
        }
        match input.split_once('=') {
            Some((key, value)) => Self::single(key, value),
            None => Self::amenity(input),
        }
    }

    /// The tag key this filter selects on.
    pub fn key(&self) -> &str {
        match self {
            Self::AllAmenities => DEFAULT_TAG_KEY,
            Self::SingleTag { key, .. } => key,
        }
    }

    /// Identifying key of a batch fetched with this filter.
    ///
    /// The tag value for a single tag, [`RESERVED_ALL_LABEL`] otherwise.
    pub fn label(&self) -> &str {
        match self {
            Self::AllAmenities => RESERVED_ALL_LABEL,
            Self::SingleTag { value, .. } => value,
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        matches!(self, Self::AllAmenities)
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllAmenities => f.write_str(RESERVED_ALL_LABEL),
            Self::SingleTag { key, value } => write!(f, "{}={}", key, value),
        }
    }
}

impl FromStr for TagFilter {
    type Err = TagFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
