use cricket_server_domain::{
    ServiceError, ServiceResult,
    coach::{Coach, CoachFilter, CoachId, CoachRepository},
};
use sqlx::{Pool, QueryBuilder, Row, Sqlite, sqlite::SqliteRow};

use crate::map_db_error;

pub struct SqliteCoachRepository {
    pool: Pool<Sqlite>,
}

impl SqliteCoachRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn coach_from_row(row: &SqliteRow) -> sqlx::Result<Coach> {
        Ok(Coach {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password")?,
            phone: row.try_get("phone")?,
            speciality: row.try_get("speciality")?,
            experience_years: row.try_get("experience_years")?,
            sport_type: row.try_get("sport_type")?,
            profile_image: row.try_get("profile_image")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }

    fn coach_from_optional_row(row: Option<SqliteRow>) -> ServiceResult<Option<Coach>> {
        row.map(|row| Self::coach_from_row(&row))
            .transpose()
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

#[async_trait::async_trait]
impl CoachRepository for SqliteCoachRepository {
    async fn get_coach_by_id(&self, id: CoachId) -> ServiceResult<Option<Coach>> {
        let row = sqlx::query("SELECT * FROM coaches WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Self::coach_from_optional_row(row)
    }

    async fn get_coach_by_email(&self, email: &str) -> ServiceResult<Option<Coach>> {
        let row = sqlx::query("SELECT * FROM coaches WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Self::coach_from_optional_row(row)
    }

    async fn get_coaches(&self, filter: &CoachFilter) -> ServiceResult<Vec<Coach>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM coaches WHERE 1 = 1");
        if !filter.include_inactive {
            query.push(" AND is_active = 1");
        }
        if let Some(sport_type) = &filter.sport_type {
            query.push(" AND sport_type = ").push_bind(sport_type.clone());
        }
        query.push(" ORDER BY id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        rows.iter()
            .map(|row| Self::coach_from_row(row).map_err(|e| ServiceError::Internal(e.to_string())))
            .collect()
    }

    async fn create_coach(&self, coach: &Coach) -> ServiceResult<CoachId> {
        let result = sqlx::query(
            "INSERT INTO coaches (name, email, password, phone, speciality, experience_years, \
             sport_type, profile_image, is_active, created_at, updated_at, deleted_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&coach.name)
        .bind(&coach.email)
        .bind(&coach.password_hash)
        .bind(&coach.phone)
        .bind(&coach.speciality)
        .bind(coach.experience_years)
        .bind(&coach.sport_type)
        .bind(&coach.profile_image)
        .bind(coach.is_active)
        .bind(coach.created_at)
        .bind(coach.updated_at)
        .bind(coach.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(result.last_insert_rowid())
    }

    async fn save_coach(&self, coach: &Coach) -> ServiceResult<()> {
        sqlx::query(
            "UPDATE coaches SET name = ?, email = ?, password = ?, phone = ?, speciality = ?, \
             experience_years = ?, sport_type = ?, profile_image = ?, is_active = ?, \
             updated_at = ?, deleted_at = ? WHERE id = ?",
        )
        .bind(&coach.name)
        .bind(&coach.email)
        .bind(&coach.password_hash)
        .bind(&coach.phone)
        .bind(&coach.speciality)
        .bind(coach.experience_years)
        .bind(&coach.sport_type)
        .bind(&coach.profile_image)
        .bind(coach.is_active)
        .bind(coach.updated_at)
        .bind(coach.deleted_at)
        .bind(coach.id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }
}
