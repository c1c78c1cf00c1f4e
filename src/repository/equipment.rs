//! Equipment repository for PostgreSQL

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{map_write_error, EquipmentRepository};
use crate::{
    error::{AppError, AppResult},
    models::equipment::{Equipment, EquipmentRow, NewEquipment},
};

#[derive(Clone)]
pub struct PgEquipmentRepository {
    pool: Pool<Postgres>,
}

impl PgEquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquipmentRepository for PgEquipmentRepository {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Equipment>> {
        sqlx::query_as::<_, EquipmentRow>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Equipment::try_from)
            .transpose()
    }

    async fn list(&self) -> AppResult<Vec<Equipment>> {
        sqlx::query_as::<_, EquipmentRow>("SELECT * FROM equipment ORDER BY name")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Equipment::try_from)
            .collect()
    }

    async fn list_by_department(&self, department: &str) -> AppResult<Vec<Equipment>> {
        sqlx::query_as::<_, EquipmentRow>("SELECT * FROM equipment WHERE department = $1 ORDER BY name")
            .bind(department)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Equipment::try_from)
            .collect()
    }

    async fn list_by_employee(&self, employee: Uuid) -> AppResult<Vec<Equipment>> {
        sqlx::query_as::<_, EquipmentRow>(
            "SELECT * FROM equipment WHERE assigned_employee = $1 ORDER BY name",
        )
        .bind(employee)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Equipment::try_from)
        .collect()
    }

    async fn create(&self, data: NewEquipment) -> AppResult<Equipment> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, EquipmentRow>(
            r#"
            INSERT INTO equipment (
                id, name, serial_number, purchase_date,
                warranty_start_date, warranty_end_date, warranty_provider,
                location, assigned_team, default_technician, assigned_employee,
                status, department, maintenance_domain, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'Active', $12, $13, $14, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.serial_number)
        .bind(data.purchase_date)
        .bind(data.warranty.start_date)
        .bind(data.warranty.end_date)
        .bind(&data.warranty.provider)
        .bind(&data.location)
        .bind(data.assigned_team)
        .bind(data.default_technician)
        .bind(data.assigned_employee)
        .bind(&data.department)
        .bind(data.maintenance_domain.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.try_into()
    }

    async fn update(&self, data: &Equipment) -> AppResult<Option<Equipment>> {
        // status is owned by the request lifecycle and never written here
        sqlx::query_as::<_, EquipmentRow>(
            r#"
            UPDATE equipment SET
                name = $2, serial_number = $3, purchase_date = $4,
                warranty_start_date = $5, warranty_end_date = $6, warranty_provider = $7,
                location = $8, assigned_team = $9, default_technician = $10,
                assigned_employee = $11, department = $12, maintenance_domain = $13,
                updated_at = $14
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(data.id)
        .bind(&data.name)
        .bind(&data.serial_number)
        .bind(data.purchase_date)
        .bind(data.warranty.start_date)
        .bind(data.warranty.end_date)
        .bind(&data.warranty.provider)
        .bind(&data.location)
        .bind(data.assigned_team)
        .bind(data.default_technician)
        .bind(data.assigned_employee)
        .bind(&data.department)
        .bind(data.maintenance_domain.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .map(Equipment::try_from)
        .transpose()
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match map_write_error(e) {
                AppError::Validation(_) => AppError::Validation(
                    "Equipment has maintenance requests and cannot be deleted".to_string(),
                ),
                other => other,
            })?;
        Ok(result.rows_affected() > 0)
    }
}
