use cricket_server_domain::{
    ServiceError, ServiceResult,
    team::{Team, TeamFilter, TeamId, TeamRepository},
};
use sqlx::{Pool, QueryBuilder, Row, Sqlite, sqlite::SqliteRow};

use crate::map_db_error;

pub struct SqliteTeamRepository {
    pool: Pool<Sqlite>,
}

impl SqliteTeamRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn team_from_row(row: &SqliteRow) -> sqlx::Result<Team> {
        Ok(Team {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            sport_type: row.try_get("sport_type")?,
            club_id: row.try_get("club_id")?,
            coach_id: row.try_get("coach_id")?,
            level: row.try_get("level")?,
            city: row.try_get("city")?,
            country: row.try_get("country")?,
            founded_year: row.try_get("founded_year")?,
            description: row.try_get("description")?,
            logo: row.try_get("logo")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }
}

#[async_trait::async_trait]
impl TeamRepository for SqliteTeamRepository {
    async fn get_team_by_id(&self, id: TeamId) -> ServiceResult<Option<Team>> {
        let row = sqlx::query("SELECT * FROM teams WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        row.map(|row| Self::team_from_row(&row))
            .transpose()
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }

    async fn get_teams(&self, filter: &TeamFilter) -> ServiceResult<Vec<Team>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM teams WHERE 1 = 1");
        if !filter.include_inactive {
            query.push(" AND is_active = 1");
        }
        if let Some(sport_type) = &filter.sport_type {
            query.push(" AND sport_type = ").push_bind(sport_type.clone());
        }
        if let Some(club_id) = filter.club_id {
            query.push(" AND club_id = ").push_bind(club_id);
        }
        if let Some(coach_id) = filter.coach_id {
            query.push(" AND coach_id = ").push_bind(coach_id);
        }
        query.push(" ORDER BY id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        rows.iter()
            .map(|row| Self::team_from_row(row).map_err(|e| ServiceError::Internal(e.to_string())))
            .collect()
    }

    async fn create_team(&self, team: &Team) -> ServiceResult<TeamId> {
        let result = sqlx::query(
            "INSERT INTO teams (name, sport_type, club_id, coach_id, level, city, country, \
             founded_year, description, logo, is_active, created_at, updated_at, deleted_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&team.name)
        .bind(&team.sport_type)
        .bind(team.club_id)
        .bind(team.coach_id)
        .bind(&team.level)
        .bind(&team.city)
        .bind(&team.country)
        .bind(team.founded_year)
        .bind(&team.description)
        .bind(&team.logo)
        .bind(team.is_active)
        .bind(team.created_at)
        .bind(team.updated_at)
        .bind(team.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(result.last_insert_rowid())
    }

    async fn save_team(&self, team: &Team) -> ServiceResult<()> {
        sqlx::query(
            "UPDATE teams SET name = ?, sport_type = ?, club_id = ?, coach_id = ?, level = ?, \
             city = ?, country = ?, founded_year = ?, description = ?, logo = ?, is_active = ?, \
             updated_at = ?, deleted_at = ? WHERE id = ?",
        )
        .bind(&team.name)
        .bind(&team.sport_type)
        .bind(team.club_id)
        .bind(team.coach_id)
        .bind(&team.level)
        .bind(&team.city)
        .bind(&team.country)
        .bind(team.founded_year)
        .bind(&team.description)
        .bind(&team.logo)
        .bind(team.is_active)
        .bind(team.updated_at)
        .bind(team.deleted_at)
        .bind(team.id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }
}
