//! Maintenance request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        enums::{RequestCategory, RequestStatus},
        equipment::EquipmentSummary,
        team::TeamSummary,
        user::UserSummary,
    },
};

#[derive(Debug, Clone, FromRow)]
pub struct RequestRow {
    id: Uuid,
    subject: String,
    description: Option<String>,
    equipment: Uuid,
    team: Uuid,
    category: String,
    scheduled_date: Option<DateTime<Utc>>,
    duration_hours: f64,
    assigned_technician: Option<Uuid>,
    status: String,
    created_by: Uuid,
    completion_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RequestRow> for MaintenanceRequest {
    type Error = AppError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        Ok(MaintenanceRequest {
            id: row.id,
            subject: row.subject,
            description: row.description,
            equipment: row.equipment,
            team: row.team,
            category: row.category.parse().map_err(AppError::Internal)?,
            scheduled_date: row.scheduled_date,
            duration_hours: row.duration_hours,
            assigned_technician: row.assigned_technician,
            status: row.status.parse().map_err(AppError::Internal)?,
            created_by: row.created_by,
            completion_date: row.completion_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Maintenance request as stored
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    pub id: Uuid,
    pub subject: String,
    pub description: Option<String>,
    pub equipment: Uuid,
    /// Equipment's team at creation time; not kept in sync afterwards
    pub team: Uuid,
    pub category: RequestCategory,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub duration_hours: f64,
    pub assigned_technician: Option<Uuid>,
    pub status: RequestStatus,
    pub created_by: Uuid,
    pub completion_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to insert, with derived fields already resolved
#[derive(Debug, Clone, PartialEq)]
pub struct NewMaintenanceRequest {
    pub subject: String,
    pub description: Option<String>,
    pub equipment: Uuid,
    pub team: Uuid,
    pub category: RequestCategory,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub assigned_technician: Option<Uuid>,
    pub created_by: Uuid,
}

/// Create maintenance request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceRequest {
    #[validate(length(min = 1, max = 300, message = "Subject is required"))]
    pub subject: String,
    /// Equipment id
    pub equipment: Uuid,
    /// Presence makes the request Preventive
    pub scheduled_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// Status change body
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// Target status label ("In Progress", "Repaired", ...)
    pub status: String,
    /// Hours spent; only used when moving to Repaired
    pub duration_hours: Option<f64>,
}

/// Technician reassignment body
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignTechnicianRequest {
    /// `null` clears the assignment
    pub technician_id: Option<Uuid>,
}

/// Request with references joined for display
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails {
    pub id: Uuid,
    pub subject: String,
    pub description: Option<String>,
    pub equipment: Option<EquipmentSummary>,
    pub team: Option<TeamSummary>,
    pub category: RequestCategory,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub duration_hours: f64,
    pub assigned_technician: Option<UserSummary>,
    pub status: RequestStatus,
    pub created_by: Option<UserSummary>,
    pub completion_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Requests of one piece of equipment
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRequests {
    pub requests: Vec<RequestDetails>,
    /// Requests still New or In Progress
    pub open_count: usize,
}
