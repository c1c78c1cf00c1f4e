//! Shared domain enums
//!
//! Every enum here is stored as TEXT and travels over the wire as its display label,
//! so `as_str`, `Display` and `FromStr` all agree on the same spelling.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Implements `as_str`, `Display` and `FromStr` from a single label table.
macro_rules! labelled_enum {
    ($name:ident, $noun:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            /// All variants, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", $noun, s)),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// User role. No hierarchy is implied between roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Admin,
    Manager,
    Technician,
    Employee,
}

labelled_enum!(Role, "role" {
    Admin => "Admin",
    Manager => "Manager",
    Technician => "Technician",
    Employee => "Employee",
});

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Maintenance request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum RequestStatus {
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    Repaired,
    Scrap,
}

labelled_enum!(RequestStatus, "status" {
    New => "New",
    InProgress => "In Progress",
    Repaired => "Repaired",
    Scrap => "Scrap",
});

impl RequestStatus {
    /// Whether the request still needs work
    pub fn is_open(&self) -> bool {
        matches!(self, RequestStatus::New | RequestStatus::InProgress)
    }
}

// ---------------------------------------------------------------------------
// RequestCategory
// ---------------------------------------------------------------------------

/// Request category, derived from the presence of a scheduled date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RequestCategory {
    Corrective,
    Preventive,
}

labelled_enum!(RequestCategory, "category" {
    Corrective => "Corrective",
    Preventive => "Preventive",
});

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Operational status of a piece of equipment
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EquipmentStatus {
    #[default]
    Active,
    Scrapped,
}

labelled_enum!(EquipmentStatus, "equipment status" {
    Active => "Active",
    Scrapped => "Scrapped",
});

// ---------------------------------------------------------------------------
// Specialization
// ---------------------------------------------------------------------------

/// Maintenance domain of a team (and of the equipment it looks after)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Specialization {
    Mechanics,
    Electricians,
    #[serde(rename = "IT Support")]
    ItSupport,
}

labelled_enum!(Specialization, "specialization" {
    Mechanics => "Mechanics",
    Electricians => "Electricians",
    ItSupport => "IT Support",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels_round_trip_through_serde() {
        let json = serde_json::to_string(&RequestStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let parsed: RequestStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, RequestStatus::InProgress);
    }

    #[test]
    fn test_from_str_matches_display() {
        for status in RequestStatus::ALL {
            assert_eq!(status.to_string().parse::<RequestStatus>().unwrap(), *status);
        }
        assert_eq!("IT Support".parse::<Specialization>().unwrap(), Specialization::ItSupport);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!("Superuser".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_parse_error_names_the_field() {
        assert_eq!("Done".parse::<RequestStatus>().unwrap_err(), "Invalid status: Done");
        assert_eq!("Boss".parse::<Role>().unwrap_err(), "Invalid role: Boss");
    }

    #[test]
    fn test_open_statuses() {
        assert!(RequestStatus::New.is_open());
        assert!(RequestStatus::InProgress.is_open());
        assert!(!RequestStatus::Repaired.is_open());
        assert!(!RequestStatus::Scrap.is_open());
    }
}
