//! Opaque, globally unique identifiers.
//!
//! Every entity gets its own newtype so a vehicle id can never be passed
//! where a trip id is expected. Ids serialize as plain strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generates a fresh random identifier.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new random id.
            #[must_use]
            pub fn generate() -> Self {
                Self(generate_id())
            }

            /// Returns the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the id and returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
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

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifies a company (tenant).
    CompanyId
);
define_id!(
    /// Identifies a user record owned by the auth provider.
    UserId
);
define_id!(
    /// Identifies a user profile.
    ProfileId
);
define_id!(
    /// Identifies a vehicle.
    VehicleId
);
define_id!(
    /// Identifies a vehicle assignment edge.
    AssignmentId
);
define_id!(
    /// Identifies a trip (logbook entry).
    TripId
);
define_id!(
    /// Identifies a trip attachment.
    AttachmentId
);
define_id!(
    /// Identifies a pending invite.
    InviteId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = VehicleId::generate();
        let b = VehicleId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = CompanyId::from("c-1");
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("c-1"));
        let back: CompanyId = serde_json::from_str("\"c-1\"").unwrap();
        assert_eq!(back, id);
        assert_eq!(id.to_string(), "c-1");
    }
}
