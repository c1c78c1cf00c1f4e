//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    config::{AuthConfig, BootstrapConfig},
    error::{AppError, AppResult},
    maintenance::access::RegistrationPolicy,
    models::{
        enums::Role,
        user::{NewUser, RegisterRequest, User, UserClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
    policy: RegistrationPolicy,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig, policy: RegistrationPolicy) -> Self {
        Self {
            repository,
            config,
            policy,
        }
    }

    /// Register a new account and return a token for it.
    ///
    /// The registration policy runs first, so a request for `Admin` is refused
    /// whatever else is wrong with it.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<(String, User)> {
        let (role, department) = self
            .policy
            .resolve(request.role.as_deref(), request.department.as_deref())?;

        if request.username.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(AppError::Validation(
                "Username, email, and password are required".to_string(),
            ));
        }
        request.validate()?;
        if request.password != request.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }

        let user = self
            .repository
            .users
            .create(NewUser {
                username: request.username.trim().to_string(),
                email: normalize_email(&request.email),
                password_hash: self.hash_password(&request.password)?,
                role,
                department,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    /// Verify email and password and return a token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            tracing::warn!(user_id = %user.id, "Failed login attempt");
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    pub async fn get_by_id(&self, id: uuid::Uuid) -> AppResult<User> {
        self.repository
            .users
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Create the configured administrator if the store has no Admin yet
    pub async fn ensure_admin(&self, bootstrap: &BootstrapConfig) -> AppResult<Option<User>> {
        let (Some(username), Some(email), Some(password)) = (
            bootstrap.admin_username.as_deref(),
            bootstrap.admin_email.as_deref(),
            bootstrap.admin_password.as_deref(),
        ) else {
            return Ok(None);
        };

        if self.repository.users.any_with_role(Role::Admin).await? {
            return Ok(None);
        }

        let admin = self
            .repository
            .users
            .create(NewUser {
                username: username.to_string(),
                email: normalize_email(email),
                password_hash: self.hash_password(password)?,
                role: Role::Admin,
                department: self.policy.management_department().to_string(),
            })
            .await?;

        tracing::info!(user_id = %admin.id, "Bootstrap administrator created");
        Ok(Some(admin))
    }

    fn create_token(&self, user: &User) -> AppResult<String> {
        UserClaims::for_user(user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> UsersService {
        UsersService::new(
            Repository::in_memory(),
            AuthConfig::default(),
            RegistrationPolicy::default(),
        )
    }

    fn registration(role: &str, department: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            username: "jdoe".to_string(),
            email: "JDoe@Example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            role: Some(role.to_string()),
            department: department.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_admin_registration_is_forbidden_even_when_invalid() {
        let mut request = registration("Admin", None);
        request.password = String::new();
        let err = service().register(request).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_manager_is_placed_in_management() {
        let (_, user) = service()
            .register(registration("Manager", Some("IT Support")))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Manager);
        assert_eq!(user.department, "Management");
    }

    #[tokio::test]
    async fn test_password_mismatch() {
        let mut request = registration("Technician", Some("Mechanics"));
        request.confirm_password = "other".to_string();
        let err = service().register(request).await.unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let mut request = registration("Employee", Some("Electricians"));
        request.username = "  ".to_string();
        let err = service().register(request).await.unwrap_err();
        assert_eq!(err.to_string(), "Username, email, and password are required");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let service = service();
        service
            .register(registration("Technician", Some("Mechanics")))
            .await
            .unwrap();
        let err = service
            .register(registration("Employee", Some("Mechanics")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "email already exists");
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let service = service();
        let (_, registered) = service
            .register(registration("Technician", Some("Mechanics")))
            .await
            .unwrap();

        let (token, user) = service.authenticate("jdoe@example.com", "secret1").await.unwrap();
        assert_eq!(user.id, registered.id);
        let claims = UserClaims::from_token(&token, &AuthConfig::default().jwt_secret).unwrap();
        assert_eq!(claims.user_id, registered.id);
        assert_eq!(claims.role, Role::Technician);

        assert!(matches!(
            service.authenticate("jdoe@example.com", "wrong").await,
            Err(AppError::Authentication(_))
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_admin_runs_once() {
        let service = service();
        let bootstrap = BootstrapConfig {
            admin_username: Some("admin".to_string()),
            admin_email: Some("admin@example.com".to_string()),
            admin_password: Some("admin123".to_string()),
        };
        let admin = service.ensure_admin(&bootstrap).await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(service.ensure_admin(&bootstrap).await.unwrap().is_none());
        assert!(service.ensure_admin(&BootstrapConfig::default()).await.unwrap().is_none());
    }
}
