//! Strongly-typed identifier value objects.
//!
//! Catalog and account rows use auto-increment keys, so every identifier
//! wraps a positive `i64`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw key as stored in the database.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Creates an identifier from untrusted input, rejecting non-positive keys.
            pub fn parse_positive(id: i64) -> Result<Self, ValidationError> {
                if id <= 0 {
                    return Err(ValidationError::not_positive($field, id));
                }
                Ok(Self(id))
            }

            /// Returns the inner key.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                let id = trimmed
                    .parse::<i64>()
                    .map_err(|e| ValidationError::invalid_format($field, e.to_string()))?;
                Self::parse_positive(id)
            }
        }
    };
}

integer_id!(
    /// Identifier of an account, supplied by the authentication layer.
    UserId,
    "user_id"
);

integer_id!(
    /// Identifier of a catalog video.
    VideoId,
    "video_id"
);

integer_id!(
    /// Identifier of a series (season pass grouping).
    SeriesId,
    "series_id"
);

integer_id!(
    /// Identifier of a module (recurring subscription grouping).
    ModuleId,
    "module_id"
);
