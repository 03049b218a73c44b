use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};
use validator::Validate;

use crate::{
    RecordId, ServiceError, ServiceResult,
    password::{INVALID_CREDENTIALS, hash_password, verify_password},
    util::{merge, merge_opt, non_blank, now, validate_email, validate_input},
};

pub type SuperAdminId = RecordId;

#[derive(Clone, Debug)]
pub struct SuperAdmin {
    pub id: SuperAdminId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Validate)]
pub struct NewSuperAdmin {
    #[validate(
        length(min = 1, max = 100, message = "must be 1 to 100 characters"),
        custom(function = "non_blank")
    )]
    pub name: String,
    pub email: String,
    #[validate(length(min = 8, max = 72, message = "must be 8 to 72 characters"))]
    pub password: String,
    #[validate(
        length(min = 1, max = 20, message = "must be 1 to 20 characters"),
        custom(function = "non_blank")
    )]
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Default, Validate)]
pub struct SuperAdminUpdate {
    #[validate(
        length(min = 1, max = 100, message = "must be 1 to 100 characters"),
        custom(function = "non_blank")
    )]
    pub name: Option<String>,
    pub email: Option<String>,
    #[validate(length(min = 8, max = 72, message = "must be 8 to 72 characters"))]
    pub password: Option<String>,
    #[validate(
        length(min = 1, max = 20, message = "must be 1 to 20 characters"),
        custom(function = "non_blank")
    )]
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct SuperAdminFilter {
    pub include_inactive: bool,
}

impl SuperAdminFilter {
    pub fn matches(&self, admin: &SuperAdmin) -> bool {
        self.include_inactive || admin.is_active
    }
}

pub type ArcSuperAdminRepository = Arc<Box<dyn SuperAdminRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait SuperAdminRepository {
    async fn get_super_admin_by_id(&self, id: SuperAdminId) -> ServiceResult<Option<SuperAdmin>>;
    async fn get_super_admin_by_email(&self, email: &str) -> ServiceResult<Option<SuperAdmin>>;
    async fn get_super_admins(&self, filter: &SuperAdminFilter) -> ServiceResult<Vec<SuperAdmin>>;
    async fn create_super_admin(&self, admin: &SuperAdmin) -> ServiceResult<SuperAdminId>;
    async fn save_super_admin(&self, admin: &SuperAdmin) -> ServiceResult<()>;
}

pub type ArcSuperAdminService = Arc<Box<dyn SuperAdminService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait SuperAdminService {
    async fn get_super_admins(&self, filter: SuperAdminFilter) -> ServiceResult<Vec<SuperAdmin>>;
    async fn get_super_admin(&self, id: SuperAdminId) -> ServiceResult<SuperAdmin>;
    async fn create_super_admin(&self, new_admin: NewSuperAdmin) -> ServiceResult<SuperAdmin>;
    async fn update_super_admin(
        &self,
        id: SuperAdminId,
        update: SuperAdminUpdate,
    ) -> ServiceResult<SuperAdmin>;
    async fn delete_super_admin(&self, id: SuperAdminId) -> ServiceResult<()>;
    async fn set_profile_image(&self, id: SuperAdminId, path: String)
    -> ServiceResult<SuperAdmin>;
    async fn try_login(&self, email: &str, password: &str) -> ServiceResult<SuperAdmin>;
}

pub struct SuperAdminServiceImpl {
    super_admin_repository: ArcSuperAdminRepository,
}

impl SuperAdminServiceImpl {
    pub fn new(super_admin_repository: ArcSuperAdminRepository) -> Self {
        Self {
            super_admin_repository,
        }
    }

    async fn ensure_email_free(&self, email: &str) -> ServiceResult<()> {
        if self
            .super_admin_repository
            .get_super_admin_by_email(email)
            .await?
            .is_some()
        {
            return ServiceError::conflict("Super admin with this email already exists");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl SuperAdminService for SuperAdminServiceImpl {
    async fn get_super_admins(&self, filter: SuperAdminFilter) -> ServiceResult<Vec<SuperAdmin>> {
        self.super_admin_repository.get_super_admins(&filter).await
    }

    async fn get_super_admin(&self, id: SuperAdminId) -> ServiceResult<SuperAdmin> {
        match self.super_admin_repository.get_super_admin_by_id(id).await? {
            Some(admin) => Ok(admin),
            None => ServiceError::not_found("Super admin not found"),
        }
    }

    async fn create_super_admin(&self, new_admin: NewSuperAdmin) -> ServiceResult<SuperAdmin> {
        validate_input(&new_admin)?;
        let email = validate_email(&new_admin.email)?;
        self.ensure_email_free(&email).await?;

        let created_at = now();
        let mut admin = SuperAdmin {
            id: 0,
            name: new_admin.name,
            email,
            password_hash: hash_password(&new_admin.password)?,
            phone: new_admin.phone,
            profile_image: None,
            is_active: true,
            created_at,
            updated_at: created_at,
            deleted_at: None,
        };
        admin.id = self
            .super_admin_repository
            .create_super_admin(&admin)
            .await?;
        info!("Created super admin {} <{}>", admin.id, admin.email);
        Ok(admin)
    }

    async fn update_super_admin(
        &self,
        id: SuperAdminId,
        update: SuperAdminUpdate,
    ) -> ServiceResult<SuperAdmin> {
        validate_input(&update)?;
        let mut admin = self.get_super_admin(id).await?;

        if let Some(email) = &update.email {
            let email = validate_email(email)?;
            if email != admin.email {
                self.ensure_email_free(&email).await?;
            }
            admin.email = email;
        }
        if let Some(password) = &update.password {
            admin.password_hash = hash_password(password)?;
        }
        merge(&mut admin.name, update.name);
        merge_opt(&mut admin.phone, update.phone);
        admin.updated_at = now();

        self.super_admin_repository.save_super_admin(&admin).await?;
        info!("Updated super admin {}", id);
        Ok(admin)
    }

    async fn delete_super_admin(&self, id: SuperAdminId) -> ServiceResult<()> {
        let mut admin = self.get_super_admin(id).await?;
        if !admin.is_active {
            return Ok(());
        }
        let active = self
            .super_admin_repository
            .get_super_admins(&SuperAdminFilter::default())
            .await?;
        if active.len() <= 1 {
            warn!("Refused to deactivate the last active super admin {}", id);
            return ServiceError::forbidden("Cannot delete the last active super admin");
        }

        let deleted_at = now();
        admin.is_active = false;
        admin.deleted_at = Some(deleted_at);
        admin.updated_at = deleted_at;
        self.super_admin_repository.save_super_admin(&admin).await?;
        info!("Deactivated super admin {}", id);
        Ok(())
    }

    async fn set_profile_image(
        &self,
        id: SuperAdminId,
        path: String,
    ) -> ServiceResult<SuperAdmin> {
        let mut admin = self.get_super_admin(id).await?;
        admin.profile_image = Some(path);
        admin.updated_at = now();
        self.super_admin_repository.save_super_admin(&admin).await?;
        Ok(admin)
    }

    async fn try_login(&self, email: &str, password: &str) -> ServiceResult<SuperAdmin> {
        let email = email.trim().to_ascii_lowercase();
        let Some(admin) = self
            .super_admin_repository
            .get_super_admin_by_email(&email)
            .await?
        else {
            return ServiceError::unauthorized(INVALID_CREDENTIALS);
        };
        if !admin.is_active || !verify_password(password, &admin.password_hash) {
            return ServiceError::unauthorized(INVALID_CREDENTIALS);
        }
        Ok(admin)
    }
}
