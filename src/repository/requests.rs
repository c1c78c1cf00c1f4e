//! Maintenance requests repository for PostgreSQL

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{map_write_error, RequestsRepository};
use crate::{
    error::AppResult,
    maintenance::lifecycle::{Cascade, TransitionPlan},
    models::{
        enums::{EquipmentStatus, RequestCategory, RequestStatus},
        request::{MaintenanceRequest, NewMaintenanceRequest, RequestRow},
    },
};

#[derive(Clone)]
pub struct PgRequestsRepository {
    pool: Pool<Postgres>,
}

impl PgRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn convert(rows: Vec<RequestRow>) -> AppResult<Vec<MaintenanceRequest>> {
    rows.into_iter().map(MaintenanceRequest::try_from).collect()
}

#[async_trait]
impl RequestsRepository for PgRequestsRepository {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRequest>> {
        sqlx::query_as::<_, RequestRow>("SELECT * FROM maintenance_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(MaintenanceRequest::try_from)
            .transpose()
    }

    async fn list(&self) -> AppResult<Vec<MaintenanceRequest>> {
        let rows = sqlx::query_as::<_, RequestRow>(
            "SELECT * FROM maintenance_requests ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        convert(rows)
    }

    async fn list_by_equipment(&self, equipment: Uuid) -> AppResult<Vec<MaintenanceRequest>> {
        let rows = sqlx::query_as::<_, RequestRow>(
            "SELECT * FROM maintenance_requests WHERE equipment = $1 ORDER BY created_at DESC",
        )
        .bind(equipment)
        .fetch_all(&self.pool)
        .await?;
        convert(rows)
    }

    async fn list_scheduled(&self) -> AppResult<Vec<MaintenanceRequest>> {
        let rows = sqlx::query_as::<_, RequestRow>(
            r#"
            SELECT * FROM maintenance_requests
            WHERE category = $1 AND scheduled_date IS NOT NULL
            ORDER BY scheduled_date ASC
            "#,
        )
        .bind(RequestCategory::Preventive.as_str())
        .fetch_all(&self.pool)
        .await?;
        convert(rows)
    }

    async fn create(&self, request: NewMaintenanceRequest) -> AppResult<MaintenanceRequest> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, RequestRow>(
            r#"
            INSERT INTO maintenance_requests (
                id, subject, description, equipment, team, category, scheduled_date,
                duration_hours, assigned_technician, status, created_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.subject)
        .bind(&request.description)
        .bind(request.equipment)
        .bind(request.team)
        .bind(request.category.as_str())
        .bind(request.scheduled_date)
        .bind(request.assigned_technician)
        .bind(RequestStatus::New.as_str())
        .bind(request.created_by)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.try_into()
    }

    async fn apply_transition(&self, plan: &TransitionPlan) -> AppResult<Option<MaintenanceRequest>> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Compare-and-swap on the status the plan was computed from
        let row = sqlx::query_as::<_, RequestRow>(
            r#"
            UPDATE maintenance_requests SET
                status = $3,
                duration_hours = COALESCE($4, duration_hours),
                completion_date = COALESCE($5, completion_date),
                updated_at = $6
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(plan.request_id)
        .bind(plan.expected.as_str())
        .bind(plan.next.as_str())
        .bind(plan.duration_hours)
        .bind(plan.completion_date)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(Cascade::ScrapEquipment(equipment)) = plan.cascade {
            sqlx::query("UPDATE equipment SET status = $2, updated_at = $3 WHERE id = $1")
                .bind(equipment)
                .bind(EquipmentStatus::Scrapped.as_str())
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        MaintenanceRequest::try_from(row).map(Some)
    }

    async fn assign_technician(
        &self,
        id: Uuid,
        technician: Option<Uuid>,
    ) -> AppResult<Option<MaintenanceRequest>> {
        sqlx::query_as::<_, RequestRow>(
            r#"
            UPDATE maintenance_requests SET assigned_technician = $2, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(technician)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .map(MaintenanceRequest::try_from)
        .transpose()
    }
}
