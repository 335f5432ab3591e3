//! Newtype IDs for type-safe entity references.
//!
//! Backend entity IDs are opaque strings minted server-side; the
//! `define_id!` macro wraps them so IDs from different entity types
//! cannot be mixed up at compile time.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper around an opaque string.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use gatherly_core::define_id;
/// define_id!(EventId);
/// define_id!(RegistrationId);
///
/// let event_id = EventId::new("evt_123");
/// let registration_id = RegistrationId::new("reg_456");
///
/// // These are different types, so this won't compile:
/// // let _: EventId = registration_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(EventId);
define_id!(ClubId);
define_id!(RegistrationId);
define_id!(OrderId);
define_id!(UserId);

/// A client-minted token that de-duplicates booking creation on retry.
///
/// The same key must accompany every retry of one registration attempt,
/// and a fresh key must be minted for a deliberately new attempt (for
/// example after the user dismissed checkout), so a stale paid order is
/// never resumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Mint a fresh key for a new registration attempt.
    #[must_use]
    pub fn mint() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_accessors() {
        let id = EventId::new("evt_42");
        assert_eq!(id.as_str(), "evt_42");
        assert_eq!(format!("{id}"), "evt_42");
        assert_eq!(id.into_inner(), "evt_42");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = RegistrationId::new("reg_9");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"reg_9\"");

        let parsed: RegistrationId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_idempotency_keys_are_unique() {
        let a = IdempotencyKey::mint();
        let b = IdempotencyKey::mint();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }
}
