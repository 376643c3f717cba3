use std::sync::Arc;

use chat_widget::{config::WidgetConfig, routes, state::AppState};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chat_widget=info,tower_http=info")),
        )
        .init();

    let config = WidgetConfig::from_env()?;
    let state = Arc::new(AppState::new(&config)?);

    let sessions = state.sessions.clone();
    let purge_interval = config.purge_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(purge_interval);
        loop {
            ticker.tick().await;
            let removed = sessions.purge_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "purged idle widget sessions");
            }
        }
    });

    let cors = CorsLayer::very_permissive();

    let app = routes::create_router(&config.static_dir)
        .with_state(state)
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    tracing::info!(
        addr = %config.bind_addr,
        backend = %config.backend_url,
        "chat widget running"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
