use cricket_server_domain::{DEFAULT_SPORT_TYPE, player_role::DEFAULT_CRICKET_ROLES};
use sqlx::{Pool, Sqlite};

const SCHEMA: [&str; 6] = [
    "CREATE TABLE IF NOT EXISTS player_roles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        sport_type TEXT NOT NULL,
        UNIQUE (name, sport_type)
    )",
    "CREATE TABLE IF NOT EXISTS players (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT,
        password TEXT NOT NULL,
        sport_type TEXT NOT NULL,
        login_type TEXT NOT NULL,
        gender TEXT,
        date_of_birth TEXT,
        nationality TEXT,
        role_id INTEGER,
        batting_style TEXT,
        bowling_style TEXT,
        dominant_hand TEXT,
        profile_image TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        deleted_at TEXT,
        UNIQUE (email, login_type, sport_type)
    )",
    "CREATE TABLE IF NOT EXISTS coaches (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        phone TEXT,
        speciality TEXT,
        experience_years INTEGER,
        sport_type TEXT NOT NULL,
        profile_image TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        deleted_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS clubs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        phone TEXT,
        address TEXT,
        city TEXT,
        country TEXT,
        sport_type TEXT NOT NULL,
        logo TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        deleted_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS teams (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        sport_type TEXT NOT NULL,
        club_id INTEGER,
        coach_id INTEGER,
        level TEXT,
        city TEXT,
        country TEXT,
        founded_year INTEGER,
        description TEXT,
        logo TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        deleted_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS super_admins (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        phone TEXT,
        profile_image TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        deleted_at TEXT
    )",
];

pub async fn create_schema(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Inserts the default cricket roles unless they already exist.
pub async fn seed_player_roles(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    for name in DEFAULT_CRICKET_ROLES {
        sqlx::query("INSERT OR IGNORE INTO player_roles (name, sport_type) VALUES (?, ?)")
            .bind(name)
            .bind(DEFAULT_SPORT_TYPE)
            .execute(pool)
            .await?;
    }
    Ok(())
}
