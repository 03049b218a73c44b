use cricket_server_domain::{
    ServiceError, ServiceResult,
    player_role::{PlayerRole, PlayerRoleId, PlayerRoleRepository},
};
use sqlx::{Pool, QueryBuilder, Row, Sqlite, sqlite::SqliteRow};

use crate::map_db_error;

pub struct SqlitePlayerRoleRepository {
    pool: Pool<Sqlite>,
}

impl SqlitePlayerRoleRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn role_from_row(row: &SqliteRow) -> ServiceResult<PlayerRole> {
        let decode = || -> sqlx::Result<PlayerRole> {
            Ok(PlayerRole {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                sport_type: row.try_get("sport_type")?,
            })
        };
        decode().map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

#[async_trait::async_trait]
impl PlayerRoleRepository for SqlitePlayerRoleRepository {
    async fn get_role_by_id(&self, id: PlayerRoleId) -> ServiceResult<Option<PlayerRole>> {
        let row = sqlx::query("SELECT id, name, sport_type FROM player_roles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        row.as_ref().map(Self::role_from_row).transpose()
    }

    async fn get_role_by_name(
        &self,
        name: &str,
        sport_type: &str,
    ) -> ServiceResult<Option<PlayerRole>> {
        let row = sqlx::query(
            "SELECT id, name, sport_type FROM player_roles WHERE name = ? AND sport_type = ?",
        )
        .bind(name)
        .bind(sport_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;
        row.as_ref().map(Self::role_from_row).transpose()
    }

    async fn get_roles(&self, sport_type: Option<&str>) -> ServiceResult<Vec<PlayerRole>> {
        let mut query =
            QueryBuilder::<Sqlite>::new("SELECT id, name, sport_type FROM player_roles");
        if let Some(sport_type) = sport_type {
            query.push(" WHERE sport_type = ").push_bind(sport_type);
        }
        query.push(" ORDER BY id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        rows.iter().map(Self::role_from_row).collect()
    }

    async fn create_role(&self, role: &PlayerRole) -> ServiceResult<PlayerRoleId> {
        let result = sqlx::query("INSERT INTO player_roles (name, sport_type) VALUES (?, ?)")
            .bind(&role.name)
            .bind(&role.sport_type)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(result.last_insert_rowid())
    }

    async fn save_role(&self, role: &PlayerRole) -> ServiceResult<()> {
        sqlx::query("UPDATE player_roles SET name = ?, sport_type = ? WHERE id = ?")
            .bind(&role.name)
            .bind(&role.sport_type)
            .bind(role.id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn delete_role(&self, id: PlayerRoleId) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM player_roles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }
}
