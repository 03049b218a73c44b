use cricket_server_domain::{
    ServiceError, ServiceResult,
    super_admin::{SuperAdmin, SuperAdminFilter, SuperAdminId, SuperAdminRepository},
};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

use crate::map_db_error;

pub struct SqliteSuperAdminRepository {
    pool: Pool<Sqlite>,
}

impl SqliteSuperAdminRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn admin_from_row(row: &SqliteRow) -> sqlx::Result<SuperAdmin> {
        Ok(SuperAdmin {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password")?,
            phone: row.try_get("phone")?,
            profile_image: row.try_get("profile_image")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }

    fn admin_from_optional_row(row: Option<SqliteRow>) -> ServiceResult<Option<SuperAdmin>> {
        row.map(|row| Self::admin_from_row(&row))
            .transpose()
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

#[async_trait::async_trait]
impl SuperAdminRepository for SqliteSuperAdminRepository {
    async fn get_super_admin_by_id(&self, id: SuperAdminId) -> ServiceResult<Option<SuperAdmin>> {
        let row = sqlx::query("SELECT * FROM super_admins WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Self::admin_from_optional_row(row)
    }

    async fn get_super_admin_by_email(&self, email: &str) -> ServiceResult<Option<SuperAdmin>> {
        let row = sqlx::query("SELECT * FROM super_admins WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Self::admin_from_optional_row(row)
    }

    async fn get_super_admins(&self, filter: &SuperAdminFilter) -> ServiceResult<Vec<SuperAdmin>> {
        let sql = if filter.include_inactive {
            "SELECT * FROM super_admins ORDER BY id"
        } else {
            "SELECT * FROM super_admins WHERE is_active = 1 ORDER BY id"
        };
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        rows.iter()
            .map(|row| Self::admin_from_row(row).map_err(|e| ServiceError::Internal(e.to_string())))
            .collect()
    }

    async fn create_super_admin(&self, admin: &SuperAdmin) -> ServiceResult<SuperAdminId> {
        let result = sqlx::query(
            "INSERT INTO super_admins (name, email, password, phone, profile_image, is_active, \
             created_at, updated_at, deleted_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(&admin.phone)
        .bind(&admin.profile_image)
        .bind(admin.is_active)
        .bind(admin.created_at)
        .bind(admin.updated_at)
        .bind(admin.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(result.last_insert_rowid())
    }

    async fn save_super_admin(&self, admin: &SuperAdmin) -> ServiceResult<()> {
        sqlx::query(
            "UPDATE super_admins SET name = ?, email = ?, password = ?, phone = ?, \
             profile_image = ?, is_active = ?, updated_at = ?, deleted_at = ? WHERE id = ?",
        )
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(&admin.phone)
        .bind(&admin.profile_image)
        .bind(admin.is_active)
        .bind(admin.updated_at)
        .bind(admin.deleted_at)
        .bind(admin.id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cricket_server_domain::super_admin::{
        NewSuperAdmin, SuperAdminService, SuperAdminServiceImpl,
    };

    use crate::create_memory_pool;

    use super::*;

    #[tokio::test]
    async fn test_service_over_sqlite() {
        let repo = SqliteSuperAdminRepository::new(create_memory_pool().await.unwrap());
        let service = SuperAdminServiceImpl::new(Arc::new(Box::new(repo)));

        let admin = service
            .create_super_admin(NewSuperAdmin {
                name: "Root".into(),
                email: "Root@Example.com".into(),
                password: "correct horse".into(),
                phone: None,
            })
            .await
            .unwrap();
        assert_eq!(admin.email, "root@example.com");

        let logged_in = service
            .try_login("root@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(logged_in.id, admin.id);

        assert!(matches!(
            service.delete_super_admin(admin.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert_eq!(
            service
                .get_super_admins(SuperAdminFilter::default())
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
