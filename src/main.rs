use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cinerate_api::api::{create_router, AppState};
use cinerate_api::config::Config;
use cinerate_api::db;
use cinerate_api::store::PgCatalogStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let pool = db::create_pool(&config.database_url).await?;
    sqlx::migrate!().run(&pool).await?;

    let state = AppState::new(Arc::new(PgCatalogStore::new(pool)));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
