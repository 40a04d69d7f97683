use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cinelog_api::{
    config::Config,
    db,
    routes::{create_router, AppState},
    store::PgLibraryStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    let store = Arc::new(PgLibraryStore::new(pool));

    let app = create_router(AppState { store });

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(host = %config.host, port = config.port, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
