//! Strongly-typed identifier value objects.
//!
//! Every identifier in the notification domain is a UUID. Tenant and ownership
//! identifiers arrive from clients, so each type parses from its string form
//! and rejects anything that is not a well-formed UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a UUID newtype with parsing, display and transparent serde.
///
/// The `generated` arm adds `new()` and `Default` for ids this service mints.
/// Ids that only ever come from callers (tenants, admins) omit it.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, generated) => {
        uuid_id!($(#[$meta])* $name);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a notification session.
    SessionId,
    generated
);

uuid_id!(
    /// Company (tenant) identifier. The isolation boundary for session visibility.
    CompanyId
);

uuid_id!(
    /// Identifier of the admin who initiated a session.
    AdminId
);

uuid_id!(
    /// Campaign a session drafts notifications for.
    CampaignId,
    generated
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn company_id_parses_well_formed_uuid() {
        let id: CompanyId = "11111111-1111-1111-1111-111111111111".parse().unwrap();
        assert_eq!(id.to_string(), "11111111-1111-1111-1111-111111111111");
    }

    #[test]
    fn malformed_input_is_rejected_for_every_id() {
        assert!("not-a-uuid".parse::<CompanyId>().is_err());
        assert!("".parse::<AdminId>().is_err());
        assert!("1234".parse::<CampaignId>().is_err());
        assert!("zzzzzzzz-1111-1111-1111-111111111111".parse::<SessionId>().is_err());
    }

    #[test]
    fn session_id_serializes_as_bare_string() {
        let id: SessionId = "33333333-3333-3333-3333-333333333333".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"33333333-3333-3333-3333-333333333333\"");
    }

    #[test]
    fn from_uuid_round_trips_through_as_uuid() {
        let raw = Uuid::new_v4();
        assert_eq!(AdminId::from_uuid(raw).as_uuid(), &raw);
    }
}
