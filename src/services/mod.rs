//! Business logic services

pub mod equipment;
pub mod requests;
pub mod teams;
pub mod users;

use crate::{
    config::AppConfig, error::AppResult, maintenance::access::RegistrationPolicy,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub teams: teams::TeamsService,
    pub equipment: equipment::EquipmentService,
    pub requests: requests::RequestsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let policy = RegistrationPolicy::from_config(&config.registration);
        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone(), policy),
            teams: teams::TeamsService::new(repository.clone()),
            equipment: equipment::EquipmentService::new(repository.clone()),
            requests: requests::RequestsService::new(repository.clone()),
            repository,
        }
    }

    /// Check that the store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.health.ping().await
    }
}
