//! Assignment resolution for new requests

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    enums::RequestCategory,
    equipment::Equipment,
    request::{CreateMaintenanceRequest, NewMaintenanceRequest},
};

/// Team and technician a new request is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub team: Uuid,
    pub technician: Option<Uuid>,
}

/// Snapshot the equipment's team and default technician.
///
/// The result is copied onto the request; later changes to the equipment do not
/// flow back into requests already created.
pub fn resolve(equipment: &Equipment) -> Assignment {
    Assignment {
        team: equipment.assigned_team,
        technician: equipment.default_technician,
    }
}

/// Scheduled work is preventive, everything else corrective
pub fn category_for(scheduled_date: Option<DateTime<Utc>>) -> RequestCategory {
    match scheduled_date {
        Some(_) => RequestCategory::Preventive,
        None => RequestCategory::Corrective,
    }
}

/// Build the request to insert from caller input and the resolved equipment
pub fn draft(
    equipment: &Equipment,
    input: CreateMaintenanceRequest,
    created_by: Uuid,
) -> NewMaintenanceRequest {
    let assignment = resolve(equipment);
    NewMaintenanceRequest {
        subject: input.subject,
        description: input.description,
        equipment: equipment.id,
        team: assignment.team,
        category: category_for(input.scheduled_date),
        scheduled_date: input.scheduled_date,
        assigned_technician: assignment.technician,
        created_by,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{
        enums::{EquipmentStatus, Specialization},
        equipment::Warranty,
    };

    pub(crate) fn equipment(team: Uuid, technician: Option<Uuid>) -> Equipment {
        let now = Utc::now();
        Equipment {
            id: Uuid::new_v4(),
            name: "CNC Lathe".to_string(),
            serial_number: "CNC-001".to_string(),
            purchase_date: now,
            warranty: Warranty::default(),
            location: "Hall A".to_string(),
            assigned_team: team,
            default_technician: technician,
            assigned_employee: Uuid::new_v4(),
            status: EquipmentStatus::Active,
            department: "Production".to_string(),
            maintenance_domain: Specialization::Mechanics,
            created_at: now,
            updated_at: now,
        }
    }

    fn input(scheduled_date: Option<DateTime<Utc>>) -> CreateMaintenanceRequest {
        CreateMaintenanceRequest {
            subject: "Spindle noise".to_string(),
            equipment: Uuid::new_v4(),
            scheduled_date,
            description: None,
        }
    }

    #[test]
    fn test_resolve_copies_team_and_technician() {
        let team = Uuid::new_v4();
        let tech = Uuid::new_v4();
        let assignment = resolve(&equipment(team, Some(tech)));
        assert_eq!(assignment, Assignment { team, technician: Some(tech) });
    }

    #[test]
    fn test_resolve_without_default_technician() {
        let team = Uuid::new_v4();
        assert_eq!(resolve(&equipment(team, None)).technician, None);
    }

    #[test]
    fn test_category_follows_scheduled_date() {
        assert_eq!(category_for(None), RequestCategory::Corrective);
        assert_eq!(category_for(Some(Utc::now())), RequestCategory::Preventive);
    }

    #[test]
    fn test_draft_uses_equipment_id_not_caller_input() {
        let team = Uuid::new_v4();
        let eq = equipment(team, None);
        let creator = Uuid::new_v4();
        let draft = draft(&eq, input(Some(Utc::now())), creator);
        assert_eq!(draft.equipment, eq.id);
        assert_eq!(draft.team, team);
        assert_eq!(draft.category, RequestCategory::Preventive);
        assert_eq!(draft.created_by, creator);
    }
}
