use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use nutrition_gateway::{config::Config, create_app, handlers::AppState, store::PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nutrition_gateway=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let store = PgStore::connect(&config.database_url).await?;
    store.migrate().await?;
    tracing::info!("connected to database");

    let port = config.port;
    let state = AppState::new(Arc::new(store), config);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
