//! Report aggregation over the full request history

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    enums::RequestStatus, equipment::Equipment, request::MaintenanceRequest,
    team::MaintenanceTeam,
};

/// Requests handled by one team
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TeamReport {
    pub team: String,
    pub count: usize,
    /// Requests in `Repaired`
    pub completed: usize,
}

/// Requests raised against one department's equipment
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentReport {
    pub department: String,
    pub count: usize,
    /// Mean of `durationHours` over every request in the group, open ones included
    pub avg_duration: f64,
}

/// Both report aggregations
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reports {
    pub requests_by_team: Vec<TeamReport>,
    pub requests_by_equipment: Vec<DepartmentReport>,
}

/// Group requests by the name of their team.
///
/// Requests whose team no longer resolves are left out.
pub fn by_team(requests: &[MaintenanceRequest], teams: &[MaintenanceTeam]) -> Vec<TeamReport> {
    let names: HashMap<Uuid, &str> = teams.iter().map(|t| (t.id, t.name.as_str())).collect();

    let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for request in requests {
        let Some(name) = names.get(&request.team) else {
            continue;
        };
        let entry = groups.entry(name).or_default();
        entry.0 += 1;
        if request.status == RequestStatus::Repaired {
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(team, (count, completed))| TeamReport {
            team: team.to_string(),
            count,
            completed,
        })
        .collect()
}

/// Group requests by the department of their equipment (not of their team).
///
/// Requests whose equipment no longer resolves are left out.
pub fn by_department(requests: &[MaintenanceRequest], equipment: &[Equipment]) -> Vec<DepartmentReport> {
    let departments: HashMap<Uuid, &str> = equipment
        .iter()
        .map(|e| (e.id, e.department.as_str()))
        .collect();

    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for request in requests {
        let Some(department) = departments.get(&request.equipment) else {
            continue;
        };
        let entry = groups.entry(department).or_default();
        entry.0 += 1;
        entry.1 += request.duration_hours;
    }

    groups
        .into_iter()
        .map(|(department, (count, total))| DepartmentReport {
            department: department.to_string(),
            count,
            avg_duration: total / count as f64,
        })
        .collect()
}

pub fn aggregate(
    requests: &[MaintenanceRequest],
    teams: &[MaintenanceTeam],
    equipment: &[Equipment],
) -> Reports {
    Reports {
        requests_by_team: by_team(requests, teams),
        requests_by_equipment: by_department(requests, equipment),
    }
}
