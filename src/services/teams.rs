//! Maintenance teams service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::team::{CreateTeam, MaintenanceTeam, UpdateTeam},
    repository::Repository,
};

#[derive(Clone)]
pub struct TeamsService {
    repository: Repository,
}

impl TeamsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<MaintenanceTeam>> {
        self.repository.teams.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<MaintenanceTeam> {
        self.repository
            .teams
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))
    }

    pub async fn create(&self, data: CreateTeam) -> AppResult<MaintenanceTeam> {
        data.validate()?;
        self.check_users(data.team_lead.iter().chain(&data.members)).await?;

        let team = self.repository.teams.create(data).await?;
        tracing::info!(team_id = %team.id, name = %team.name, "Team created");
        Ok(team)
    }

    pub async fn update(&self, id: Uuid, data: UpdateTeam) -> AppResult<MaintenanceTeam> {
        data.validate()?;
        let mut team = self.get_by_id(id).await?;
        self.check_users(data.team_lead.iter().chain(data.members.iter().flatten()))
            .await?;

        data.apply_to(&mut team);
        let team = self
            .repository
            .teams
            .update(&team)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))?;
        tracing::info!(team_id = %team.id, "Team updated");
        Ok(team)
    }

    async fn check_users<'a>(&self, ids: impl Iterator<Item = &'a Uuid>) -> AppResult<()> {
        for id in ids {
            if self.repository.users.get_by_id(*id).await?.is_none() {
                return Err(AppError::NotFound(format!("User {} not found", id)));
            }
        }
        Ok(())
    }
}
