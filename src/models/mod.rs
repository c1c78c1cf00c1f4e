//! Data models for GearGuard

pub mod enums;
pub mod equipment;
pub mod request;
pub mod team;
pub mod user;

// Re-export commonly used types
pub use enums::{EquipmentStatus, RequestCategory, RequestStatus, Role, Specialization};
pub use equipment::{Equipment, EquipmentSummary};
pub use request::{MaintenanceRequest, RequestDetails};
pub use team::{MaintenanceTeam, TeamSummary};
pub use user::{User, UserClaims, UserSummary};
