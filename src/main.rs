// Lobby Graph Server - social graph queries and mutations over HTTP

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lobby_graph::{app_state::AppState, config::Config, http_api::create_router, schemas};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,lobby_graph=debug")),
        )
        .init();

    if let Err(errors) = schemas::validate_schemas() {
        anyhow::bail!("schema registry is inconsistent: {}", errors.join("; "));
    }

    let config = Config::from_env()?;
    let state = AppState::new(config.clone()).await?;
    let app = create_router(state);

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!(%address, database = %config.database.url, "lobby graph server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
