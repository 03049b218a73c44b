use std::sync::Arc;

use cricket_persistence_sqlite::super_admins::SqliteSuperAdminRepository;
use cricket_server_domain::super_admin::{NewSuperAdmin, SuperAdminService, SuperAdminServiceImpl};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 && args.len() != 5 {
        eprintln!("Usage: add_admin <name> <email> <password> [<phone>]");
        std::process::exit(1);
    }

    let db_path = std::env::var("CRICKET_DB").expect("CRICKET_DB env var not set");

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

    let service =
        SuperAdminServiceImpl::new(Arc::new(Box::new(SqliteSuperAdminRepository::new(pool))));

    let new_admin = NewSuperAdmin {
        name: args[1].clone(),
        email: args[2].clone(),
        password: args[3].clone(),
        phone: args.get(4).cloned(),
    };

    match service.create_super_admin(new_admin).await {
        Ok(admin) => println!("Created super admin [{}] with id {}", admin.email, admin.id),
        Err(e) => {
            eprintln!("Failed to create super admin: {}", e);
            std::process::exit(1);
        }
    }
}
