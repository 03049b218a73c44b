use cricket_server_domain::{
    ServiceError, ServiceResult,
    player::{Player, PlayerAccountKey, PlayerFilter, PlayerId, PlayerRepository},
};
use sqlx::{Pool, QueryBuilder, Row, Sqlite, sqlite::SqliteRow};

use crate::map_db_error;

pub struct SqlitePlayerRepository {
    pool: Pool<Sqlite>,
}

impl SqlitePlayerRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn player_from_row(row: &SqliteRow) -> sqlx::Result<Player> {
        Ok(Player {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            password_hash: row.try_get("password")?,
            sport_type: row.try_get("sport_type")?,
            login_type: row.try_get("login_type")?,
            gender: row.try_get("gender")?,
            date_of_birth: row.try_get("date_of_birth")?,
            nationality: row.try_get("nationality")?,
            role_id: row.try_get("role_id")?,
            batting_style: row.try_get("batting_style")?,
            bowling_style: row.try_get("bowling_style")?,
            dominant_hand: row.try_get("dominant_hand")?,
            profile_image: row.try_get("profile_image")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }

    fn player_from_optional_row(row: Option<SqliteRow>) -> ServiceResult<Option<Player>> {
        row.map(|row| Self::player_from_row(&row))
            .transpose()
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

#[async_trait::async_trait]
impl PlayerRepository for SqlitePlayerRepository {
    async fn get_player_by_id(&self, id: PlayerId) -> ServiceResult<Option<Player>> {
        let row = sqlx::query("SELECT * FROM players WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Self::player_from_optional_row(row)
    }

    async fn get_player_by_account(
        &self,
        key: &PlayerAccountKey,
    ) -> ServiceResult<Option<Player>> {
        let row = sqlx::query(
            "SELECT * FROM players WHERE email = ? AND login_type = ? AND sport_type = ?",
        )
        .bind(&key.email)
        .bind(&key.login_type)
        .bind(&key.sport_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;
        Self::player_from_optional_row(row)
    }

    async fn get_players(&self, filter: &PlayerFilter) -> ServiceResult<Vec<Player>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM players WHERE 1 = 1");
        if !filter.include_inactive {
            query.push(" AND is_active = 1");
        }
        if let Some(sport_type) = &filter.sport_type {
            query.push(" AND sport_type = ").push_bind(sport_type.clone());
        }
        if let Some(role_id) = filter.role_id {
            query.push(" AND role_id = ").push_bind(role_id);
        }
        query.push(" ORDER BY id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        rows.iter()
            .map(|row| {
                Self::player_from_row(row).map_err(|e| ServiceError::Internal(e.to_string()))
            })
            .collect()
    }

    async fn create_player(&self, player: &Player) -> ServiceResult<PlayerId> {
        let result = sqlx::query(
            "INSERT INTO players (name, email, phone, password, sport_type, login_type, gender, \
             date_of_birth, nationality, role_id, batting_style, bowling_style, dominant_hand, \
             profile_image, is_active, created_at, updated_at, deleted_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&player.name)
        .bind(&player.email)
        .bind(&player.phone)
        .bind(&player.password_hash)
        .bind(&player.sport_type)
        .bind(&player.login_type)
        .bind(&player.gender)
        .bind(player.date_of_birth)
        .bind(&player.nationality)
        .bind(player.role_id)
        .bind(&player.batting_style)
        .bind(&player.bowling_style)
        .bind(&player.dominant_hand)
        .bind(&player.profile_image)
        .bind(player.is_active)
        .bind(player.created_at)
        .bind(player.updated_at)
        .bind(player.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(result.last_insert_rowid())
    }

    async fn save_player(&self, player: &Player) -> ServiceResult<()> {
        sqlx::query(
            "UPDATE players SET name = ?, email = ?, phone = ?, password = ?, sport_type = ?, \
             login_type = ?, gender = ?, date_of_birth = ?, nationality = ?, role_id = ?, \
             batting_style = ?, bowling_style = ?, dominant_hand = ?, profile_image = ?, \
             is_active = ?, updated_at = ?, deleted_at = ? WHERE id = ?",
        )
        .bind(&player.name)
        .bind(&player.email)
        .bind(&player.phone)
        .bind(&player.password_hash)
        .bind(&player.sport_type)
        .bind(&player.login_type)
        .bind(&player.gender)
        .bind(player.date_of_birth)
        .bind(&player.nationality)
        .bind(player.role_id)
        .bind(&player.batting_style)
        .bind(&player.bowling_style)
        .bind(&player.dominant_hand)
        .bind(&player.profile_image)
        .bind(player.is_active)
        .bind(player.updated_at)
        .bind(player.deleted_at)
        .bind(player.id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use crate::create_memory_pool;

    use super::*;

    fn player(email: &str, sport_type: &str) -> Player {
        let now = Utc::now();
        Player {
            id: 0,
            name: "Virat".into(),
            email: email.into(),
            phone: None,
            password_hash: "$2b$04$hash".into(),
            sport_type: sport_type.into(),
            login_type: "email".into(),
            gender: Some("male".into()),
            date_of_birth: NaiveDate::from_ymd_opt(1988, 11, 5),
            nationality: Some("Indian".into()),
            role_id: Some(1),
            batting_style: Some("Right-hand bat".into()),
            bowling_style: None,
            dominant_hand: Some("right".into()),
            profile_image: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_account_key_lookup() {
        let repo = SqlitePlayerRepository::new(create_memory_pool().await.unwrap());
        let cricket = repo.create_player(&player("p@x.com", "cricket")).await.unwrap();
        let football = repo.create_player(&player("p@x.com", "football")).await.unwrap();
        assert_ne!(cricket, football);

        let key = PlayerAccountKey {
            email: "p@x.com".into(),
            login_type: "email".into(),
            sport_type: "football".into(),
        };
        let found = repo.get_player_by_account(&key).await.unwrap().unwrap();
        assert_eq!(found.id, football);
        assert_eq!(found.date_of_birth, NaiveDate::from_ymd_opt(1988, 11, 5));
    }

    #[tokio::test]
    async fn test_same_account_key_conflicts() {
        let repo = SqlitePlayerRepository::new(create_memory_pool().await.unwrap());
        repo.create_player(&player("p@x.com", "cricket")).await.unwrap();
        assert!(matches!(
            repo.create_player(&player("p@x.com", "cricket")).await,
            Err(ServiceError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_filter_by_role() {
        let repo = SqlitePlayerRepository::new(create_memory_pool().await.unwrap());
        repo.create_player(&player("a@x.com", "cricket")).await.unwrap();
        let mut bowler = player("b@x.com", "cricket");
        bowler.role_id = Some(2);
        let bowler_id = repo.create_player(&bowler).await.unwrap();

        let bowlers = repo
            .get_players(&PlayerFilter {
                role_id: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(bowlers.len(), 1);
        assert_eq!(bowlers[0].id, bowler_id);
    }
}
