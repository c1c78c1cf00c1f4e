//! In-process storage backend
//!
//! All four tables live behind one `RwLock`, so a transition and its cascade are
//! applied under a single write guard.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EquipmentRepository, HealthRepository, RequestsRepository, TeamsRepository, UsersRepository};
use crate::{
    error::{AppError, AppResult},
    maintenance::lifecycle::{Cascade, TransitionPlan},
    models::{
        enums::{EquipmentStatus, RequestCategory, RequestStatus, Role},
        equipment::{Equipment, NewEquipment},
        request::{MaintenanceRequest, NewMaintenanceRequest},
        team::{CreateTeam, MaintenanceTeam},
        user::{NewUser, User},
    },
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    teams: HashMap<Uuid, MaintenanceTeam>,
    equipment: HashMap<Uuid, Equipment>,
    requests: HashMap<Uuid, MaintenanceRequest>,
}

impl Tables {
    fn serial_taken(&self, serial: &str, except: Option<Uuid>) -> bool {
        self.equipment
            .values()
            .any(|e| e.serial_number == serial && Some(e.id) != except)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

fn newest_first(mut requests: Vec<MaintenanceRequest>) -> Vec<MaintenanceRequest> {
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    requests
}

fn by_name(mut equipment: Vec<Equipment>) -> Vec<Equipment> {
    equipment.sort_by(|a, b| a.name.cmp(&b.name));
    equipment
}

#[async_trait]
impl UsersRepository for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.tables.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict { field: "email".to_string() });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password: user.password_hash,
            role: user.role,
            department: user.department,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn any_with_role(&self, role: Role) -> AppResult<bool> {
        Ok(self.tables.read().await.users.values().any(|u| u.role == role))
    }
}

#[async_trait]
impl TeamsRepository for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceTeam>> {
        Ok(self.tables.read().await.teams.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<MaintenanceTeam>> {
        let mut teams: Vec<MaintenanceTeam> = self.tables.read().await.teams.values().cloned().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teams)
    }

    async fn create(&self, team: CreateTeam) -> AppResult<MaintenanceTeam> {
        let now = Utc::now();
        let team = MaintenanceTeam {
            id: Uuid::new_v4(),
            name: team.name,
            specialization: team.specialization,
            members: team.members,
            team_lead: team.team_lead,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.teams.insert(team.id, team.clone());
        Ok(team)
    }

    async fn update(&self, team: &MaintenanceTeam) -> AppResult<Option<MaintenanceTeam>> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.teams.get_mut(&team.id) else {
            return Ok(None);
        };
        *stored = MaintenanceTeam {
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..team.clone()
        };
        Ok(Some(stored.clone()))
    }
}

#[async_trait]
impl EquipmentRepository for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Equipment>> {
        Ok(self.tables.read().await.equipment.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Equipment>> {
        Ok(by_name(self.tables.read().await.equipment.values().cloned().collect()))
    }

    async fn list_by_department(&self, department: &str) -> AppResult<Vec<Equipment>> {
        let tables = self.tables.read().await;
        Ok(by_name(
            tables
                .equipment
                .values()
                .filter(|e| e.department == department)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_employee(&self, employee: Uuid) -> AppResult<Vec<Equipment>> {
        let tables = self.tables.read().await;
        Ok(by_name(
            tables
                .equipment
                .values()
                .filter(|e| e.assigned_employee == employee)
                .cloned()
                .collect(),
        ))
    }

    async fn create(&self, data: NewEquipment) -> AppResult<Equipment> {
        let mut tables = self.tables.write().await;
        if tables.serial_taken(&data.serial_number, None) {
            return Err(AppError::Conflict { field: "serialNumber".to_string() });
        }

        let now = Utc::now();
        let equipment = Equipment {
            id: Uuid::new_v4(),
            name: data.name,
            serial_number: data.serial_number,
            purchase_date: data.purchase_date,
            warranty: data.warranty,
            location: data.location,
            assigned_team: data.assigned_team,
            default_technician: data.default_technician,
            assigned_employee: data.assigned_employee,
            status: EquipmentStatus::Active,
            department: data.department,
            maintenance_domain: data.maintenance_domain,
            created_at: now,
            updated_at: now,
        };
        tables.equipment.insert(equipment.id, equipment.clone());
        Ok(equipment)
    }

    async fn update(&self, data: &Equipment) -> AppResult<Option<Equipment>> {
        let mut tables = self.tables.write().await;
        if tables.serial_taken(&data.serial_number, Some(data.id)) {
            return Err(AppError::Conflict { field: "serialNumber".to_string() });
        }
        let Some(stored) = tables.equipment.get_mut(&data.id) else {
            return Ok(None);
        };
        *stored = Equipment {
            status: stored.status,
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..data.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.requests.values().any(|r| r.equipment == id) {
            return Err(AppError::Validation(
                "Equipment has maintenance requests and cannot be deleted".to_string(),
            ));
        }
        Ok(tables.equipment.remove(&id).is_some())
    }
}

#[async_trait]
impl RequestsRepository for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRequest>> {
        Ok(self.tables.read().await.requests.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<MaintenanceRequest>> {
        Ok(newest_first(self.tables.read().await.requests.values().cloned().collect()))
    }

    async fn list_by_equipment(&self, equipment: Uuid) -> AppResult<Vec<MaintenanceRequest>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .requests
                .values()
                .filter(|r| r.equipment == equipment)
                .cloned()
                .collect(),
        ))
    }

    async fn list_scheduled(&self) -> AppResult<Vec<MaintenanceRequest>> {
        let tables = self.tables.read().await;
        let mut scheduled: Vec<MaintenanceRequest> = tables
            .requests
            .values()
            .filter(|r| r.category == RequestCategory::Preventive && r.scheduled_date.is_some())
            .cloned()
            .collect();
        scheduled.sort_by_key(|r| r.scheduled_date);
        Ok(scheduled)
    }

    async fn create(&self, request: NewMaintenanceRequest) -> AppResult<MaintenanceRequest> {
        let mut tables = self.tables.write().await;
        if !tables.equipment.contains_key(&request.equipment) {
            return Err(AppError::Validation("Referenced record does not exist".to_string()));
        }

        let now = Utc::now();
        let request = MaintenanceRequest {
            id: Uuid::new_v4(),
            subject: request.subject,
            description: request.description,
            equipment: request.equipment,
            team: request.team,
            category: request.category,
            scheduled_date: request.scheduled_date,
            duration_hours: 0.0,
            assigned_technician: request.assigned_technician,
            status: RequestStatus::New,
            created_by: request.created_by,
            completion_date: None,
            created_at: now,
            updated_at: now,
        };
        tables.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn apply_transition(&self, plan: &TransitionPlan) -> AppResult<Option<MaintenanceRequest>> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        let Some(request) = tables.requests.get_mut(&plan.request_id) else {
            return Ok(None);
        };
        if request.status != plan.expected {
            return Ok(None);
        }
        plan.apply_to(request, now);
        let updated = request.clone();

        if let Some(Cascade::ScrapEquipment(id)) = plan.cascade {
            if let Some(equipment) = tables.equipment.get_mut(&id) {
                equipment.status = EquipmentStatus::Scrapped;
                equipment.updated_at = now;
            }
        }

        Ok(Some(updated))
    }

    async fn assign_technician(
        &self,
        id: Uuid,
        technician: Option<Uuid>,
    ) -> AppResult<Option<MaintenanceRequest>> {
        let mut tables = self.tables.write().await;
        Ok(tables.requests.get_mut(&id).map(|request| {
            request.assigned_technician = technician;
            request.updated_at = Utc::now();
            request.clone()
        }))
    }
}

#[async_trait]
impl HealthRepository for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maintenance::lifecycle::plan;
    use crate::models::{enums::Specialization, equipment::Warranty};

    async fn seed_equipment(store: &MemoryStore, serial: &str) -> Equipment {
        EquipmentRepository::create(
            store,
            NewEquipment {
                name: "Hydraulic press".to_string(),
                serial_number: serial.to_string(),
                purchase_date: Utc::now(),
                warranty: Warranty::default(),
                location: "Plant 2".to_string(),
                assigned_team: Uuid::new_v4(),
                default_technician: None,
                assigned_employee: Uuid::new_v4(),
                department: "Production".to_string(),
                maintenance_domain: Specialization::Mechanics,
            },
        )
        .await
        .unwrap()
    }

    async fn seed_request(store: &MemoryStore, equipment: &Equipment) -> MaintenanceRequest {
        RequestsRepository::create(
            store,
            NewMaintenanceRequest {
                subject: "Oil leak".to_string(),
                description: None,
                equipment: equipment.id,
                team: equipment.assigned_team,
                category: RequestCategory::Corrective,
                scheduled_date: None,
                assigned_technician: None,
                created_by: Uuid::new_v4(),
            },
        )
        .await
        .unwrap()
    }

    async fn advance(store: &MemoryStore, id: Uuid, to: RequestStatus) -> Option<MaintenanceRequest> {
        let current = RequestsRepository::get_by_id(store, id).await.unwrap().unwrap();
        let plan = plan(&current, to, None, Utc::now()).unwrap();
        store.apply_transition(&plan).await.unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_serial_is_a_conflict() {
        let store = MemoryStore::default();
        seed_equipment(&store, "SN-1").await;
        let err = EquipmentRepository::create(
            &store,
            NewEquipment {
                name: "Other".to_string(),
                serial_number: "SN-1".to_string(),
                purchase_date: Utc::now(),
                warranty: Warranty::default(),
                location: "Plant 1".to_string(),
                assigned_team: Uuid::new_v4(),
                default_technician: None,
                assigned_employee: Uuid::new_v4(),
                department: "Production".to_string(),
                maintenance_domain: Specialization::Mechanics,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict { ref field } if field == "serialNumber"));
    }

    #[tokio::test]
    async fn test_scrap_cascades_in_same_write() {
        let store = MemoryStore::default();
        let equipment = seed_equipment(&store, "SN-2").await;
        let request = seed_request(&store, &equipment).await;

        advance(&store, request.id, RequestStatus::InProgress).await.unwrap();
        let scrapped = advance(&store, request.id, RequestStatus::Scrap).await.unwrap();
        assert_eq!(scrapped.status, RequestStatus::Scrap);

        let equipment = EquipmentRepository::get_by_id(&store, equipment.id).await.unwrap().unwrap();
        assert_eq!(equipment.status, EquipmentStatus::Scrapped);
    }

    #[tokio::test]
    async fn test_stale_plan_is_not_applied() {
        let store = MemoryStore::default();
        let equipment = seed_equipment(&store, "SN-3").await;
        let request = seed_request(&store, &equipment).await;

        let stale = plan(&request, RequestStatus::InProgress, None, Utc::now()).unwrap();
        assert!(store.apply_transition(&stale).await.unwrap().is_some());
        // same plan again: the stored status is no longer New
        assert!(store.apply_transition(&stale).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_never_touches_status() {
        let store = MemoryStore::default();
        let equipment = seed_equipment(&store, "SN-4").await;
        let request = seed_request(&store, &equipment).await;
        advance(&store, request.id, RequestStatus::InProgress).await;
        advance(&store, request.id, RequestStatus::Scrap).await;

        let mut edited = equipment.clone();
        edited.location = "Scrapyard".to_string();
        let updated = EquipmentRepository::update(&store, &edited).await.unwrap().unwrap();
        assert_eq!(updated.location, "Scrapyard");
        assert_eq!(updated.status, EquipmentStatus::Scrapped);
    }

    #[tokio::test]
    async fn test_delete_blocked_while_referenced() {
        let store = MemoryStore::default();
        let referenced = seed_equipment(&store, "SN-5").await;
        let unused = seed_equipment(&store, "SN-6").await;
        seed_request(&store, &referenced).await;

        assert!(matches!(
            EquipmentRepository::delete(&store, referenced.id).await,
            Err(AppError::Validation(_))
        ));
        assert!(EquipmentRepository::delete(&store, unused.id).await.unwrap());
        assert!(!EquipmentRepository::delete(&store, unused.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_assign_technician_on_missing_request() {
        let store = MemoryStore::default();
        assert!(store
            .assign_technician(Uuid::new_v4(), Some(Uuid::new_v4()))
            .await
            .unwrap()
            .is_none());
    }
}
