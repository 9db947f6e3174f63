use std::sync::Arc;

use hkpass_app::build_application;
use hkpass_persistence_sea_orm::{
    create_db_pool, create_schema, minigames::MiniGameRepositoryImpl,
    players::PlayerRepositoryImpl, scoreboard::ScoreboardRepositoryImpl,
    settings::SettingsRepositoryImpl, teams::TeamRepositoryImpl,
};
use log::{error, info};

use crate::config::Config;

mod config;
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

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logs::init_logger(&config.log_file_path, &config.log_archive_pattern) {
        eprintln!("Failed to initialize logger: {}", e);
        std::process::exit(1);
    }

    let db = match create_db_pool(&config.database_url, config.db_max_connections).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to {}: {}", config.database_url, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = create_schema(&db).await {
        error!("Failed to create database schema: {}", e);
        std::process::exit(1);
    }

    let team_repo = Arc::new(TeamRepositoryImpl::new(db.clone()));
    let player_repo = Arc::new(PlayerRepositoryImpl::new(db.clone()));
    let minigame_repo = Arc::new(MiniGameRepositoryImpl::new(db.clone()));
    let settings_repo = Arc::new(SettingsRepositoryImpl::new(db.clone()));
    let scoreboard_repo = Arc::new(ScoreboardRepositoryImpl::new(db));

    let app = Arc::new(build_application(
        team_repo,
        player_repo,
        minigame_repo,
        settings_repo,
        scoreboard_repo,
    ));

    if let Err(e) = app.settings_manage_use_case.ensure_settings().await {
        error!("Failed to seed settings: {}", e);
        std::process::exit(1);
    }

    info!("Starting application");

    if let Err(e) = hkpass_http_api::run(app, &config.host, config.http_port, shutdown_signal()).await
    {
        error!("HTTP server failed: {}", e);
        std::process::exit(1);
    }

    info!("Application shut down gracefully");
}
