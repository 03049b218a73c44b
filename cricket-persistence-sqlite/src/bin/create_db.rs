use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let db_path = std::env::var("CRICKET_DB").expect("CRICKET_DB env var not set");
    if let Some(parent) = std::path::Path::new(&db_path).parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory for DB");
        println!("Created parent directory for DB at {}", parent.display());
    }

    let connect_options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options)
        .await
        .expect("Failed to create pool");

    cricket_persistence_sqlite::schema::create_schema(&pool)
        .await
        .expect("Failed to create tables");
    cricket_persistence_sqlite::schema::seed_player_roles(&pool)
        .await
        .expect("Failed to seed player roles");

    println!("Initialized DB at {}", db_path);
}
