//! Role gate and self-registration policy
//!
//! Each operation carries a static role whitelist. The gate only answers whether a
//! role is on the list: there is no hierarchy between roles and no superuser bypass,
//! so `Admin` is allowed exactly where it is listed.

use crate::{
    config::RegistrationConfig,
    error::{AppError, AppResult},
    models::enums::Role,
};

/// Outcome of a role gate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Allow iff `role` is in `allowed`
pub fn authorize(role: Role, allowed: &[Role]) -> Decision {
    if allowed.contains(&role) {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

const ANY_AUTHENTICATED: &[Role] = &[Role::Admin, Role::Manager, Role::Technician, Role::Employee];
const MAINTAINERS: &[Role] = &[Role::Technician, Role::Manager, Role::Admin];
const SUPERVISORS: &[Role] = &[Role::Manager, Role::Admin];
const ADMINISTRATORS: &[Role] = &[Role::Admin];

/// Gated operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateRequest,
    UpdateRequestStatus,
    AssignTechnician,
    ViewKanban,
    ViewCalendar,
    ViewReports,
    ViewTransitionTable,
    ViewEquipmentRequests,
    ListEquipment,
    ViewEquipmentByDepartment,
    ViewEquipmentByEmployee,
    CreateEquipment,
    UpdateEquipment,
    DeleteEquipment,
    ListTeams,
    CreateTeam,
    UpdateTeam,
    ListUsers,
}

impl Operation {
    /// The role whitelist for this operation
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Operation::CreateRequest
            | Operation::ViewKanban
            | Operation::ViewCalendar
            | Operation::ViewTransitionTable
            | Operation::ViewEquipmentRequests
            | Operation::ListEquipment
            | Operation::ViewEquipmentByDepartment
            | Operation::ViewEquipmentByEmployee
            | Operation::ListTeams
            | Operation::ListUsers => ANY_AUTHENTICATED,
            Operation::UpdateRequestStatus => MAINTAINERS,
            Operation::AssignTechnician
            | Operation::ViewReports
            | Operation::UpdateEquipment
            | Operation::CreateTeam
            | Operation::UpdateTeam => SUPERVISORS,
            Operation::CreateEquipment | Operation::DeleteEquipment => ADMINISTRATORS,
        }
    }

    /// Human readable name used in denial messages
    pub fn describe(self) -> &'static str {
        match self {
            Operation::CreateRequest => "create maintenance requests",
            Operation::UpdateRequestStatus => "change request status",
            Operation::AssignTechnician => "assign technicians",
            Operation::ViewKanban => "view the kanban board",
            Operation::ViewCalendar => "view the maintenance calendar",
            Operation::ViewReports => "view reports",
            Operation::ViewTransitionTable => "view the status table",
            Operation::ViewEquipmentRequests => "view equipment requests",
            Operation::ListEquipment => "list equipment",
            Operation::ViewEquipmentByDepartment => "view equipment by department",
            Operation::ViewEquipmentByEmployee => "view equipment by employee",
            Operation::CreateEquipment => "create equipment",
            Operation::UpdateEquipment => "update equipment",
            Operation::DeleteEquipment => "delete equipment",
            Operation::ListTeams => "list teams",
            Operation::CreateTeam => "create teams",
            Operation::UpdateTeam => "update teams",
            Operation::ListUsers => "list users",
        }
    }
}

/// Roles a caller may pick for themselves. Not configurable: `Admin` is never here.
pub const SELF_REGISTERABLE_ROLES: &[Role] = &[Role::Manager, Role::Technician, Role::Employee];

/// Server-side role and department policy for self-registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPolicy {
    management_department: String,
    allowed_departments: Vec<String>,
}

impl RegistrationPolicy {
    pub fn new(management_department: impl Into<String>, allowed_departments: Vec<String>) -> Self {
        Self {
            management_department: management_department.into(),
            allowed_departments,
        }
    }

    pub fn from_config(config: &RegistrationConfig) -> Self {
        Self::new(
            config.management_department.clone(),
            config.allowed_departments.clone(),
        )
    }

    pub fn management_department(&self) -> &str {
        &self.management_department
    }

    pub fn allowed_departments(&self) -> &[String] {
        &self.allowed_departments
    }

    /// Resolve the role and department a registration ends up with.
    ///
    /// The supplied values are only requests: `Admin` is refused outright, managers are
    /// placed in the management department whatever they asked for, and everyone else
    /// must name a whitelisted department.
    pub fn resolve(&self, role: Option<&str>, department: Option<&str>) -> AppResult<(Role, String)> {
        let role = match role.map(str::parse::<Role>) {
            Some(Ok(Role::Admin)) => {
                return Err(AppError::Forbidden("Admin registration not allowed".to_string()));
            }
            Some(Ok(role)) if SELF_REGISTERABLE_ROLES.contains(&role) => role,
            _ => return Err(AppError::Validation("Invalid role selected".to_string())),
        };

        if role == Role::Manager {
            return Ok((role, self.management_department.clone()));
        }

        let department = department
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| AppError::Validation("Department is required for this role".to_string()))?;

        if !self.allowed_departments.iter().any(|d| d == department) {
            return Err(AppError::Validation("Invalid department selected".to_string()));
        }

        Ok((role, department.to_string()))
    }
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self::from_config(&RegistrationConfig::default())
    }
}
