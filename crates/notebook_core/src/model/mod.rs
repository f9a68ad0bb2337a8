//! Domain model for notes and tags.
//!
//! # Responsibility
//! - Define the records stored in the two persisted collections.
//! - Define the derived note view handed to callers.
//!
//! # Invariants
//! - Notes reference tags by id, never by value.
//! - A dangling tag id is legal state, not corruption.
//! - Ids are opaque strings; stored ids are accepted whatever their format.

/// Declares an opaque string id serialized as a bare JSON string.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh id (hyphenated UUID v4 text).
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

pub mod note;
pub mod tag;
