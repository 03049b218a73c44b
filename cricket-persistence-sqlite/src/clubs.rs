use cricket_server_domain::{
    ServiceError, ServiceResult,
    club::{Club, ClubFilter, ClubId, ClubRepository},
};
use sqlx::{Pool, QueryBuilder, Row, Sqlite, sqlite::SqliteRow};

use crate::map_db_error;

pub struct SqliteClubRepository {
    pool: Pool<Sqlite>,
}

impl SqliteClubRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn club_from_row(row: &SqliteRow) -> sqlx::Result<Club> {
        Ok(Club {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            country: row.try_get("country")?,
            sport_type: row.try_get("sport_type")?,
            logo: row.try_get("logo")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }

    fn club_from_optional_row(row: Option<SqliteRow>) -> ServiceResult<Option<Club>> {
        row.map(|row| Self::club_from_row(&row))
            .transpose()
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ClubRepository for SqliteClubRepository {
    async fn get_club_by_id(&self, id: ClubId) -> ServiceResult<Option<Club>> {
        let row = sqlx::query("SELECT * FROM clubs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Self::club_from_optional_row(row)
    }

    async fn get_club_by_email(&self, email: &str) -> ServiceResult<Option<Club>> {
        let row = sqlx::query("SELECT * FROM clubs WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Self::club_from_optional_row(row)
    }

    async fn get_clubs(&self, filter: &ClubFilter) -> ServiceResult<Vec<Club>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM clubs WHERE 1 = 1");
        if !filter.include_inactive {
            query.push(" AND is_active = 1");
        }
        if let Some(sport_type) = &filter.sport_type {
            query.push(" AND sport_type = ").push_bind(sport_type.clone());
        }
        if let Some(city) = &filter.city {
            query.push(" AND city = ").push_bind(city.clone());
        }
        query.push(" ORDER BY id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        rows.iter()
            .map(|row| Self::club_from_row(row).map_err(|e| ServiceError::Internal(e.to_string())))
            .collect()
    }

    async fn create_club(&self, club: &Club) -> ServiceResult<ClubId> {
        let result = sqlx::query(
            "INSERT INTO clubs (name, email, password, phone, address, city, country, \
             sport_type, logo, is_active, created_at, updated_at, deleted_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&club.name)
        .bind(&club.email)
        .bind(&club.password_hash)
        .bind(&club.phone)
        .bind(&club.address)
        .bind(&club.city)
        .bind(&club.country)
        .bind(&club.sport_type)
        .bind(&club.logo)
        .bind(club.is_active)
        .bind(club.created_at)
        .bind(club.updated_at)
        .bind(club.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(result.last_insert_rowid())
    }

    async fn save_club(&self, club: &Club) -> ServiceResult<()> {
        sqlx::query(
            "UPDATE clubs SET name = ?, email = ?, password = ?, phone = ?, address = ?, \
             city = ?, country = ?, sport_type = ?, logo = ?, is_active = ?, updated_at = ?, \
             deleted_at = ? WHERE id = ?",
        )
        .bind(&club.name)
        .bind(&club.email)
        .bind(&club.password_hash)
        .bind(&club.phone)
        .bind(&club.address)
        .bind(&club.city)
        .bind(&club.country)
        .bind(&club.sport_type)
        .bind(&club.logo)
        .bind(club.is_active)
        .bind(club.updated_at)
        .bind(club.deleted_at)
        .bind(club.id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }
}
