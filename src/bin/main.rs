use std::fs;
use std::net::SocketAddr;

use migration::{Migrator, MigratorTrait};
use transfer_service::bootstrap::initialize_admin_user;
use transfer_service::static_service::get_database_connection;
use transfer_service::utils::shutdown::shutdown_signal;
use transfer_service::{app, config::APP_CONFIG, utils::tracing::init_standard_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_standard_tracing(env!("CARGO_CRATE_NAME"));

    tracing::info!("Starting application...");

    tracing::info!("Create upload folders");
    fs::create_dir_all(format!("{}/transcripts", APP_CONFIG.upload_dir))?;
    fs::create_dir_all(format!("{}/syllabi", APP_CONFIG.upload_dir))?;

    // Initialize database connection
    let db_connection = get_database_connection().await;

    tracing::info!("Running database migrations...");
    Migrator::up(db_connection, None).await?;

    // Initialize default admin user
    tracing::info!("Checking admin user...");
    if let Err(e) = initialize_admin_user(db_connection).await {
        tracing::error!("Failed to initialize admin user: {}", e);
        tracing::warn!("Continuing without admin user initialization...");
    }

    let app = app::create_app().await?;

    let http_address = format!("0.0.0.0:{}", APP_CONFIG.port);
    tracing::info!("HTTP server listening on {}", &http_address);

    let listener = tokio::net::TcpListener::bind(http_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
