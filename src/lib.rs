pub mod api; // REST API: router, endpoints, server lifecycle
pub mod config;
pub mod models;
pub mod db;
pub mod validation; // Field rules for inbound payloads
pub mod patients; // Patient operations + sorting

use tracing_subscriber::EnvFilter;

/// Startup failures surfaced by [`run`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize logging, prepare the database, and serve until Ctrl-C.
pub async fn run() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = config::ServiceConfig::from_env()?;
    if !config.allowed_email_domains.is_empty() {
        tracing::info!(
            domains = ?config.allowed_email_domains,
            "Restricting contact emails to configured domains"
        );
    }

    // Schema setup happens once here, never per request
    db::initialize(&config.db_path)?;

    let server = api::start_api_server(config).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Ctrl-C received, shutting down");
    server.stop().await;

    Ok(())
}
