//! Maintenance team model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppError, models::enums::Specialization};

#[derive(Debug, Clone, FromRow)]
pub struct TeamRow {
    id: Uuid,
    name: String,
    specialization: String,
    members: Vec<Uuid>,
    team_lead: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TeamRow> for MaintenanceTeam {
    type Error = AppError;

    fn try_from(row: TeamRow) -> Result<Self, Self::Error> {
        Ok(MaintenanceTeam {
            id: row.id,
            name: row.name,
            specialization: row.specialization.parse().map_err(AppError::Internal)?,
            members: row.members,
            team_lead: row.team_lead,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Maintenance team. Referenced by equipment and requests, never owned by them.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTeam {
    pub id: Uuid,
    pub name: String,
    pub specialization: Specialization,
    /// Member user ids
    pub members: Vec<Uuid>,
    pub team_lead: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceTeam {
    pub fn summary(&self) -> TeamSummary {
        TeamSummary {
            id: self.id,
            name: self.name.clone(),
            specialization: self.specialization,
        }
    }
}

/// Short team representation embedded in other resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub id: Uuid,
    pub name: String,
    pub specialization: Specialization,
}

/// Create team request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeam {
    #[validate(length(min = 1, max = 200, message = "Team name is required"))]
    pub name: String,
    pub specialization: Specialization,
    #[serde(default)]
    pub members: Vec<Uuid>,
    pub team_lead: Option<Uuid>,
}

/// Update team request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeam {
    #[validate(length(min = 1, max = 200, message = "Team name cannot be empty"))]
    pub name: Option<String>,
    pub specialization: Option<Specialization>,
    pub members: Option<Vec<Uuid>>,
    pub team_lead: Option<Uuid>,
}

impl UpdateTeam {
    pub fn apply_to(&self, team: &mut MaintenanceTeam) {
        if let Some(ref name) = self.name {
            team.name = name.clone();
        }
        if let Some(specialization) = self.specialization {
            team.specialization = specialization;
        }
        if let Some(ref members) = self.members {
            team.members = members.clone();
        }
        if let Some(lead) = self.team_lead {
            team.team_lead = Some(lead);
        }
    }
}
