//! Maintenance requests service
//!
//! Orchestrates the lifecycle engine: loads what a decision needs, asks the
//! engine, and hands the outcome to the store.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    maintenance::{
        assignment,
        kanban::{self, KanbanBoard},
        lifecycle::{self, Cascade, TransitionRule},
        reports::{self, Reports},
    },
    models::{
        enums::RequestStatus,
        equipment::EquipmentSummary,
        request::{CreateMaintenanceRequest, EquipmentRequests, MaintenanceRequest, RequestDetails},
        team::TeamSummary,
        user::UserSummary,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

/// Reference data used to join requests for display
struct Lookup {
    equipment: HashMap<Uuid, EquipmentSummary>,
    teams: HashMap<Uuid, TeamSummary>,
    users: HashMap<Uuid, UserSummary>,
}

impl Lookup {
    fn details(&self, request: MaintenanceRequest) -> RequestDetails {
        let user = |id: Option<Uuid>| id.and_then(|id| self.users.get(&id).cloned());
        RequestDetails {
            id: request.id,
            subject: request.subject,
            description: request.description,
            equipment: self.equipment.get(&request.equipment).cloned(),
            team: self.teams.get(&request.team).cloned(),
            category: request.category,
            scheduled_date: request.scheduled_date,
            duration_hours: request.duration_hours,
            assigned_technician: user(request.assigned_technician),
            status: request.status,
            created_by: user(Some(request.created_by)),
            completion_date: request.completion_date,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<MaintenanceRequest> {
        self.repository
            .requests
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))
    }

    /// Create a request routed to the equipment's team and default technician
    pub async fn create(
        &self,
        created_by: Uuid,
        data: CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceRequest> {
        data.validate()?;
        let equipment = self
            .repository
            .equipment
            .get_by_id(data.equipment)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", data.equipment)))?;

        let request = self
            .repository
            .requests
            .create(assignment::draft(&equipment, data, created_by))
            .await?;

        tracing::info!(
            request_id = %request.id,
            equipment_id = %request.equipment,
            team_id = %request.team,
            category = %request.category,
            "Maintenance request created"
        );
        Ok(request)
    }

    /// Move a request to `status`, applying the transition's side effects atomically
    pub async fn update_status(
        &self,
        id: Uuid,
        status: &str,
        duration_hours: Option<f64>,
    ) -> AppResult<MaintenanceRequest> {
        let current = self.get_by_id(id).await?;
        let to: RequestStatus = status.parse().map_err(AppError::Validation)?;

        let plan = match lifecycle::plan(&current, to, duration_hours, Utc::now()) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(request_id = %id, error = %e, "Transition rejected");
                return Err(e);
            }
        };

        let Some(updated) = self.repository.requests.apply_transition(&plan).await? else {
            // Another writer moved the request first; report against what is stored now
            let stored = self.get_by_id(id).await?;
            tracing::warn!(
                request_id = %id,
                expected = %plan.expected,
                actual = %stored.status,
                "Transition lost a concurrent update"
            );
            return Err(AppError::InvalidTransition { from: stored.status, to });
        };

        tracing::info!(
            request_id = %id,
            from = %plan.expected,
            to = %updated.status,
            "Request status changed"
        );
        if let Some(Cascade::ScrapEquipment(equipment)) = plan.cascade {
            tracing::info!(request_id = %id, equipment_id = %equipment, "Equipment scrapped");
        }
        Ok(updated)
    }

    /// Overwrite the technician of a request in any status. `None` unassigns.
    pub async fn assign_technician(
        &self,
        id: Uuid,
        technician: Option<Uuid>,
    ) -> AppResult<MaintenanceRequest> {
        self.get_by_id(id).await?;
        if let Some(technician) = technician {
            if self.repository.users.get_by_id(technician).await?.is_none() {
                return Err(AppError::NotFound(format!("User {} not found", technician)));
            }
        }

        let request = self
            .repository
            .requests
            .assign_technician(id, technician)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

        tracing::info!(
            request_id = %id,
            technician_id = ?technician,
            "Technician assigned"
        );
        Ok(request)
    }

    pub async fn kanban(&self) -> AppResult<KanbanBoard<RequestDetails>> {
        let requests = self.repository.requests.list().await?;
        let details = self.join(requests).await?;
        Ok(kanban::project(details))
    }

    /// Preventive requests with a scheduled date, earliest first
    pub async fn calendar(&self) -> AppResult<Vec<RequestDetails>> {
        let requests = self.repository.requests.list_scheduled().await?;
        self.join(requests).await
    }

    pub async fn reports(&self) -> AppResult<Reports> {
        let requests = self.repository.requests.list().await?;
        let teams = self.repository.teams.list().await?;
        let equipment = self.repository.equipment.list().await?;
        Ok(reports::aggregate(&requests, &teams, &equipment))
    }

    /// Requests of one piece of equipment with the number still open
    pub async fn for_equipment(&self, equipment: Uuid) -> AppResult<EquipmentRequests> {
        if self.repository.equipment.get_by_id(equipment).await?.is_none() {
            return Err(AppError::NotFound(format!("Equipment {} not found", equipment)));
        }

        let requests = self.repository.requests.list_by_equipment(equipment).await?;
        let open_count = requests.iter().filter(|r| r.status.is_open()).count();
        Ok(EquipmentRequests {
            requests: self.join(requests).await?,
            open_count,
        })
    }

    pub fn transition_table(&self) -> Vec<TransitionRule> {
        lifecycle::transition_table()
    }

    async fn join(&self, requests: Vec<MaintenanceRequest>) -> AppResult<Vec<RequestDetails>> {
        let lookup = Lookup {
            equipment: self
                .repository
                .equipment
                .list()
                .await?
                .iter()
                .map(|e| (e.id, e.summary()))
                .collect(),
            teams: self
                .repository
                .teams
                .list()
                .await?
                .iter()
                .map(|t| (t.id, t.summary()))
                .collect(),
            users: self
                .repository
                .users
                .list()
                .await?
                .iter()
                .map(|u| (u.id, u.summary()))
                .collect(),
        };
        Ok(requests.into_iter().map(|r| lookup.details(r)).collect())
    }
}
