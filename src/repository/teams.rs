//! Maintenance teams repository for PostgreSQL

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{map_write_error, TeamsRepository};
use crate::{
    error::AppResult,
    models::team::{CreateTeam, MaintenanceTeam, TeamRow},
};

#[derive(Clone)]
pub struct PgTeamsRepository {
    pool: Pool<Postgres>,
}

impl PgTeamsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamsRepository for PgTeamsRepository {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceTeam>> {
        sqlx::query_as::<_, TeamRow>("SELECT * FROM maintenance_teams WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(MaintenanceTeam::try_from)
            .transpose()
    }

    async fn list(&self) -> AppResult<Vec<MaintenanceTeam>> {
        sqlx::query_as::<_, TeamRow>("SELECT * FROM maintenance_teams ORDER BY name")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(MaintenanceTeam::try_from)
            .collect()
    }

    async fn create(&self, team: CreateTeam) -> AppResult<MaintenanceTeam> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            INSERT INTO maintenance_teams (id, name, specialization, members, team_lead, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&team.name)
        .bind(team.specialization.as_str())
        .bind(&team.members)
        .bind(team.team_lead)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.try_into()
    }

    async fn update(&self, team: &MaintenanceTeam) -> AppResult<Option<MaintenanceTeam>> {
        sqlx::query_as::<_, TeamRow>(
            r#"
            UPDATE maintenance_teams
            SET name = $2, specialization = $3, members = $4, team_lead = $5, updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(team.id)
        .bind(&team.name)
        .bind(team.specialization.as_str())
        .bind(&team.members)
        .bind(team.team_lead)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .map(MaintenanceTeam::try_from)
        .transpose()
    }
}
