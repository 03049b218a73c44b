use std::{str::FromStr, sync::Arc, time::Duration};

use cricket_server_domain::{ServiceError, app::Repositories};
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{
    clubs::SqliteClubRepository, coaches::SqliteCoachRepository,
    player_roles::SqlitePlayerRoleRepository, players::SqlitePlayerRepository,
    super_admins::SqliteSuperAdminRepository, teams::SqliteTeamRepository,
};

pub mod clubs;
pub mod coaches;
pub mod player_roles;
pub mod players;
pub mod schema;
pub mod super_admins;
pub mod teams;

const MAX_CONNECTIONS: u32 = 5;

pub fn create_db_pool(db_path: &str) -> Pool<Sqlite> {
    let conn_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_lazy_with(conn_options)
}

/// A single-connection pool over a private in-memory database with the
/// schema applied and the default roles seeded.
pub async fn create_memory_pool() -> Result<Pool<Sqlite>, sqlx::Error> {
    let conn_options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(conn_options)
        .await?;
    schema::create_schema(&pool).await?;
    schema::seed_player_roles(&pool).await?;
    Ok(pool)
}

pub fn create_repositories(pool: Pool<Sqlite>) -> Repositories {
    Repositories {
        player_repository: Arc::new(Box::new(SqlitePlayerRepository::new(pool.clone()))),
        coach_repository: Arc::new(Box::new(SqliteCoachRepository::new(pool.clone()))),
        club_repository: Arc::new(Box::new(SqliteClubRepository::new(pool.clone()))),
        team_repository: Arc::new(Box::new(SqliteTeamRepository::new(pool.clone()))),
        player_role_repository: Arc::new(Box::new(SqlitePlayerRoleRepository::new(pool.clone()))),
        super_admin_repository: Arc::new(Box::new(SqliteSuperAdminRepository::new(pool))),
    }
}

fn map_db_error(e: sqlx::Error) -> ServiceError {
    if let Some(db_error) = e.as_database_error()
        && db_error.is_unique_violation()
    {
        return ServiceError::Conflict("Record already exists".to_string());
    }
    ServiceError::Internal(e.to_string())
}
