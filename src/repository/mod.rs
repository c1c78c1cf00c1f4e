//! Repository layer for storage operations
//!
//! Each entity has an async trait describing the primitives the services need.
//! Two backends implement them: PostgreSQL (`Pg*Repository`, one per entity) and
//! [`memory::MemoryStore`], a single in-process store implementing every trait.

pub mod equipment;
pub mod memory;
pub mod requests;
pub mod teams;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    maintenance::lifecycle::TransitionPlan,
    models::{
        enums::Role,
        equipment::{Equipment, NewEquipment},
        request::{MaintenanceRequest, NewMaintenanceRequest},
        team::{CreateTeam, MaintenanceTeam},
        user::{NewUser, User},
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn list(&self) -> AppResult<Vec<User>>;

    /// Insert a user. A taken email yields `Conflict { field: "email" }`.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    async fn any_with_role(&self, role: Role) -> AppResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamsRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceTeam>>;

    async fn list(&self) -> AppResult<Vec<MaintenanceTeam>>;

    async fn create(&self, team: CreateTeam) -> AppResult<MaintenanceTeam>;

    /// Overwrite the stored team. `None` when it no longer exists.
    async fn update(&self, team: &MaintenanceTeam) -> AppResult<Option<MaintenanceTeam>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Equipment>>;

    async fn list(&self) -> AppResult<Vec<Equipment>>;

    async fn list_by_department(&self, department: &str) -> AppResult<Vec<Equipment>>;

    async fn list_by_employee(&self, employee: Uuid) -> AppResult<Vec<Equipment>>;

    /// Insert equipment with status `Active`. A taken serial number yields
    /// `Conflict { field: "serialNumber" }`.
    async fn create(&self, equipment: NewEquipment) -> AppResult<Equipment>;

    /// Overwrite every column except `status`. `None` when it no longer exists.
    async fn update(&self, equipment: &Equipment) -> AppResult<Option<Equipment>>;

    /// Delete equipment. Fails with `Validation` while any request references it;
    /// `false` when it did not exist.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestsRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRequest>>;

    /// Every request, newest first
    async fn list(&self) -> AppResult<Vec<MaintenanceRequest>>;

    /// Requests of one piece of equipment, newest first
    async fn list_by_equipment(&self, equipment: Uuid) -> AppResult<Vec<MaintenanceRequest>>;

    /// Preventive requests with a scheduled date, earliest first
    async fn list_scheduled(&self) -> AppResult<Vec<MaintenanceRequest>>;

    /// Insert with status `New` and zero duration
    async fn create(&self, request: NewMaintenanceRequest) -> AppResult<MaintenanceRequest>;

    /// Apply a transition plan and its cascade as one unit.
    ///
    /// Returns `None` without writing anything when the request is missing or its
    /// status is no longer `plan.expected`.
    async fn apply_transition(&self, plan: &TransitionPlan) -> AppResult<Option<MaintenanceRequest>>;

    /// Overwrite the assigned technician. `None` when the request does not exist.
    async fn assign_technician(
        &self,
        id: Uuid,
        technician: Option<Uuid>,
    ) -> AppResult<Option<MaintenanceRequest>>;
}

/// Store liveness, used by the readiness probe
#[async_trait]
pub trait HealthRepository: Send + Sync {
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding one handle per entity store
#[derive(Clone)]
pub struct Repository {
    pub users: Arc<dyn UsersRepository>,
    pub teams: Arc<dyn TeamsRepository>,
    pub equipment: Arc<dyn EquipmentRepository>,
    pub requests: Arc<dyn RequestsRepository>,
    pub health: Arc<dyn HealthRepository>,
}

impl Repository {
    /// PostgreSQL-backed repository sharing one pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::PgUsersRepository::new(pool.clone())),
            teams: Arc::new(teams::PgTeamsRepository::new(pool.clone())),
            equipment: Arc::new(equipment::PgEquipmentRepository::new(pool.clone())),
            requests: Arc::new(requests::PgRequestsRepository::new(pool.clone())),
            health: Arc::new(PgHealth { pool }),
        }
    }

    /// Repository over a fresh in-process store
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::default());
        Self {
            users: store.clone(),
            teams: store.clone(),
            equipment: store.clone(),
            requests: store.clone(),
            health: store,
        }
    }
}

struct PgHealth {
    pool: Pool<Postgres>,
}

#[async_trait]
impl HealthRepository for PgHealth {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Map unique violations on known constraints to `Conflict`, everything else to `Database`
pub(crate) fn map_write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = err {
        if db.is_unique_violation() {
            let field = match db.constraint() {
                Some("users_email_key") => "email",
                Some("equipment_serial_number_key") => "serialNumber",
                _ => "record",
            };
            return AppError::Conflict { field: field.to_string() };
        }
        if db.is_foreign_key_violation() {
            return AppError::Validation("Referenced record does not exist".to_string());
        }
    }
    AppError::Database(err)
}
