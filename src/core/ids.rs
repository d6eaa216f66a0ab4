//! String-backed identifiers used across the session model.
//!
//! The remote authority speaks in opaque strings (`"me"`, `"C001"`, UUIDs),
//! so every identifier is a transparent newtype over `String`. The newtypes
//! keep player ids, card-definition ids and instance ids from being mixed up
//! while serializing exactly like the wire format.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the identifier is empty or whitespace only.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id! {
    /// Player identifier as assigned by the session (e.g. `"me"`, `"p2"`).
    PlayerId
}

string_id! {
    /// Card definition identifier (e.g. `"C001"`, `"EX901"`).
    CardDefId
}

string_id! {
    /// Identifier of one physical card instance in a session.
    InstanceId
}
