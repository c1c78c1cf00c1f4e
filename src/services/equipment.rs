//! Equipment service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{CreateEquipment, Equipment, NewEquipment, UpdateEquipment},
        team::MaintenanceTeam,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Equipment> {
        self.repository
            .equipment
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    pub async fn list_by_department(&self, department: &str) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list_by_department(department).await
    }

    pub async fn list_by_employee(&self, employee: Uuid) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list_by_employee(employee).await
    }

    /// Create equipment.
    ///
    /// The maintenance domain must match the assigned team's specialization; when
    /// omitted it is taken from the team.
    pub async fn create(&self, data: CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        let team = self.team(data.assigned_team).await?;

        let domain = data.maintenance_domain.unwrap_or(team.specialization);
        if domain != team.specialization {
            return Err(AppError::Validation(format!(
                "Team specialization {} does not match maintenance domain {}",
                team.specialization, domain
            )));
        }

        self.check_user(data.assigned_employee).await?;
        if let Some(technician) = data.default_technician {
            self.check_user(technician).await?;
        }

        let equipment = self
            .repository
            .equipment
            .create(NewEquipment {
                name: data.name,
                serial_number: data.serial_number,
                purchase_date: data.purchase_date,
                warranty: data.warranty,
                location: data.location,
                assigned_team: data.assigned_team,
                default_technician: data.default_technician,
                assigned_employee: data.assigned_employee,
                department: data.department,
                maintenance_domain: domain,
            })
            .await?;

        tracing::info!(
            equipment_id = %equipment.id,
            serial_number = %equipment.serial_number,
            team_id = %equipment.assigned_team,
            "Equipment created"
        );
        Ok(equipment)
    }

    /// Update descriptive fields and assignments. Status cannot be changed here.
    pub async fn update(&self, id: Uuid, data: UpdateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        let mut equipment = self.get_by_id(id).await?;

        if let Some(team) = data.assigned_team {
            self.team(team).await?;
        }
        if let Some(employee) = data.assigned_employee {
            self.check_user(employee).await?;
        }
        if let Some(technician) = data.default_technician {
            self.check_user(technician).await?;
        }

        data.apply_to(&mut equipment);
        let equipment = self
            .repository
            .equipment
            .update(&equipment)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;

        tracing::info!(equipment_id = %equipment.id, "Equipment updated");
        Ok(equipment)
    }

    /// Delete equipment that no request refers to
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repository.equipment.delete(id).await? {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        tracing::info!(equipment_id = %id, "Equipment deleted");
        Ok(())
    }

    async fn team(&self, id: Uuid) -> AppResult<MaintenanceTeam> {
        self.repository
            .teams
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))
    }

    async fn check_user(&self, id: Uuid) -> AppResult<()> {
        match self.repository.users.get_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("User {} not found", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{
        enums::{Role, Specialization},
        equipment::Warranty,
        team::CreateTeam,
        user::NewUser,
    };

    struct Fixture {
        repository: Repository,
        service: EquipmentService,
        team: MaintenanceTeam,
        employee: Uuid,
    }

    async fn fixture() -> Fixture {
        let repository = Repository::in_memory();
        let team = repository
            .teams
            .create(CreateTeam {
                name: "Electricians".to_string(),
                specialization: Specialization::Electricians,
                members: Vec::new(),
                team_lead: None,
            })
            .await
            .unwrap();
        let employee = repository
            .users
            .create(NewUser {
                username: "operator".to_string(),
                email: "operator@example.com".to_string(),
                password_hash: String::new(),
                role: Role::Employee,
                department: "Electricians".to_string(),
            })
            .await
            .unwrap()
            .id;
        Fixture {
            service: EquipmentService::new(repository.clone()),
            repository,
            team,
            employee,
        }
    }

    fn create(f: &Fixture, serial: &str, domain: Option<Specialization>) -> CreateEquipment {
        CreateEquipment {
            name: "Switchboard".to_string(),
            serial_number: serial.to_string(),
            purchase_date: Utc::now(),
            warranty: Warranty::default(),
            location: "Basement".to_string(),
            assigned_team: f.team.id,
            default_technician: None,
            assigned_employee: f.employee,
            department: "Facilities".to_string(),
            maintenance_domain: domain,
        }
    }

    #[tokio::test]
    async fn test_domain_defaults_to_team_specialization() {
        let f = fixture().await;
        let equipment = f.service.create(create(&f, "SB-1", None)).await.unwrap();
        assert_eq!(equipment.maintenance_domain, Specialization::Electricians);
    }

    #[tokio::test]
    async fn test_domain_mismatch_is_rejected() {
        let f = fixture().await;
        let err = f
            .service
            .create(create(&f, "SB-2", Some(Specialization::Mechanics)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_team_is_not_found() {
        let f = fixture().await;
        let mut data = create(&f, "SB-3", None);
        data.assigned_team = Uuid::new_v4();
        assert!(matches!(f.service.create(data).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_filters() {
        let f = fixture().await;
        f.service.create(create(&f, "SB-4", None)).await.unwrap();
        assert_eq!(f.service.list_by_department("Facilities").await.unwrap().len(), 1);
        assert!(f.service.list_by_department("Finance").await.unwrap().is_empty());
        assert_eq!(f.service.list_by_employee(f.employee).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_equipment() {
        let f = fixture().await;
        assert!(matches!(f.service.delete(Uuid::new_v4()).await, Err(AppError::NotFound(_))));
        assert!(f.repository.equipment.list().await.unwrap().is_empty());
    }
}
