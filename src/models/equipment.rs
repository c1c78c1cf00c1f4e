//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::enums::{EquipmentStatus, Specialization},
};

#[derive(Debug, Clone, FromRow)]
pub struct EquipmentRow {
    id: Uuid,
    name: String,
    serial_number: String,
    purchase_date: DateTime<Utc>,
    warranty_start_date: Option<DateTime<Utc>>,
    warranty_end_date: Option<DateTime<Utc>>,
    warranty_provider: Option<String>,
    location: String,
    assigned_team: Uuid,
    default_technician: Option<Uuid>,
    assigned_employee: Uuid,
    status: String,
    department: String,
    maintenance_domain: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EquipmentRow> for Equipment {
    type Error = AppError;

    fn try_from(row: EquipmentRow) -> Result<Self, Self::Error> {
        Ok(Equipment {
            id: row.id,
            name: row.name,
            serial_number: row.serial_number,
            purchase_date: row.purchase_date,
            warranty: Warranty {
                start_date: row.warranty_start_date,
                end_date: row.warranty_end_date,
                provider: row.warranty_provider,
            },
            location: row.location,
            assigned_team: row.assigned_team,
            default_technician: row.default_technician,
            assigned_employee: row.assigned_employee,
            status: row.status.parse().map_err(AppError::Internal)?,
            department: row.department,
            maintenance_domain: row.maintenance_domain.parse().map_err(AppError::Internal)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Warranty coverage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Warranty {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub provider: Option<String>,
}

/// Equipment record
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    /// Unique serial number
    pub serial_number: String,
    pub purchase_date: DateTime<Utc>,
    pub warranty: Warranty,
    pub location: String,
    /// Team responsible for maintenance
    pub assigned_team: Uuid,
    /// Technician assigned to new requests by default
    pub default_technician: Option<Uuid>,
    /// Employee using the equipment
    pub assigned_employee: Uuid,
    pub status: EquipmentStatus,
    pub department: String,
    /// Must match the assigned team's specialization at creation
    pub maintenance_domain: Specialization,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    pub fn summary(&self) -> EquipmentSummary {
        EquipmentSummary {
            id: self.id,
            name: self.name.clone(),
            serial_number: self.serial_number.clone(),
            department: self.department.clone(),
            status: self.status,
        }
    }
}

/// Short equipment representation embedded in requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSummary {
    pub id: Uuid,
    pub name: String,
    pub serial_number: String,
    pub department: String,
    pub status: EquipmentStatus,
}

/// Create equipment request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipment {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Serial number is required"))]
    pub serial_number: String,
    pub purchase_date: DateTime<Utc>,
    #[serde(default)]
    pub warranty: Warranty,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub assigned_team: Uuid,
    pub default_technician: Option<Uuid>,
    pub assigned_employee: Uuid,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
    /// Defaults to the assigned team's specialization
    pub maintenance_domain: Option<Specialization>,
}

/// Equipment to insert, after the team has been checked
#[derive(Debug, Clone)]
pub struct NewEquipment {
    pub name: String,
    pub serial_number: String,
    pub purchase_date: DateTime<Utc>,
    pub warranty: Warranty,
    pub location: String,
    pub assigned_team: Uuid,
    pub default_technician: Option<Uuid>,
    pub assigned_employee: Uuid,
    pub department: String,
    pub maintenance_domain: Specialization,
}

/// Update equipment request
///
/// Status is absent on purpose: equipment is only scrapped through a request.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipment {
    #[validate(length(min = 1, max = 200, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Serial number cannot be empty"))]
    pub serial_number: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub warranty: Option<Warranty>,
    pub location: Option<String>,
    pub assigned_team: Option<Uuid>,
    pub default_technician: Option<Uuid>,
    pub assigned_employee: Option<Uuid>,
    pub department: Option<String>,
}

impl UpdateEquipment {
    pub fn apply_to(&self, equipment: &mut Equipment) {
        if let Some(ref name) = self.name {
            equipment.name = name.clone();
        }
        if let Some(ref serial) = self.serial_number {
            equipment.serial_number = serial.clone();
        }
        if let Some(date) = self.purchase_date {
            equipment.purchase_date = date;
        }
        if let Some(ref warranty) = self.warranty {
            equipment.warranty = warranty.clone();
        }
        if let Some(ref location) = self.location {
            equipment.location = location.clone();
        }
        if let Some(team) = self.assigned_team {
            equipment.assigned_team = team;
        }
        if let Some(technician) = self.default_technician {
            equipment.default_technician = Some(technician);
        }
        if let Some(employee) = self.assigned_employee {
            equipment.assigned_employee = employee;
        }
        if let Some(ref department) = self.department {
            equipment.department = department.clone();
        }
    }
}
