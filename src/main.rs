use std::sync::Arc;

use movie_magic::{
    api::{create_router, AppState},
    config::Config,
    services::{Catalog, TmdbProvider},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_magic=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let workflow = config.workflow()?;

    // A missing or corrupt catalog is fatal
    let catalog = Catalog::load(&config.catalog_path)?;

    let provider = Arc::new(TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_language.clone(),
    ));

    let state = AppState::new(
        catalog,
        provider,
        config.tmdb_image_url.clone(),
        config.fetch_concurrency,
        workflow,
    );

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
