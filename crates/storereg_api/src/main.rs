use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use storereg_api::config::Config;
use storereg_api::routes::app_router;
use storereg_api::AppState;
use storereg_service::notify::Notifier;
use storereg_service::{build_s3_client, RegistryService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    let s3 = build_s3_client(&config.s3_endpoint, &config.s3_region).await;

    let notifier = Notifier::from_env();
    if notifier.is_none() {
        tracing::warn!("email notifier not configured; finished notifications disabled");
    }

    let service = RegistryService::new(
        pool,
        s3,
        config.s3_bucket.clone(),
        config.s3_endpoint.clone(),
        notifier,
    );

    let app = app_router(AppState { service });

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
