use cricket_persistence_sqlite::{create_db_pool, create_repositories, schema};
use cricket_server_api::{
    config::ApiConfig,
    http::{self, AppState},
};
use cricket_server_domain::app::build_application;
use log::{error, info};

mod logs;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    logs::init_logger();

    let config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let db_path = std::env::var("CRICKET_DB").expect("CRICKET_DB must be set");
    let pool = create_db_pool(&db_path);
    schema::create_schema(&pool)
        .await
        .expect("Failed to create database schema");
    schema::seed_player_roles(&pool)
        .await
        .expect("Failed to seed player roles");

    let app = build_application(create_repositories(pool));

    info!("Starting application");

    if let Err(e) = http::serve(AppState::new(app, config), shutdown_signal()).await {
        error!("HTTP API failed: {}", e);
        std::process::exit(1);
    }
}
