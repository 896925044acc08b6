use media_catalog::{
    adapters::{memory::MediaRepository as InMemoryMediaRepository, postgres::PostgresMediaRepository},
    api::{handlers::AppState, router::create_router},
    application::catalog::ServiceDependencies,
    config::{Config, StorageBackend},
    ports::MediaRepository,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "media_catalog=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Initialize storage adapter
    let media_repository: Arc<dyn MediaRepository> = match config.storage {
        StorageBackend::Postgres => {
            tracing::info!("Database URL: {}", config.database_url);

            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;

            Arc::new(PostgresMediaRepository::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on shutdown");
            Arc::new(InMemoryMediaRepository::new())
        }
    };

    // Create application state
    let service_deps = ServiceDependencies { media_repository };
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
