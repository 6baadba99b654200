use anyhow::{Context, Result};
use shop_graph::api::{router, AppState};
use shop_graph::config::Config;
use shop_graph::readiness;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("🚀 Recommendation API starting...");

    let config = Config::from_env()?;
    let timeout = Duration::from_secs(config.readiness_timeout_secs);
    readiness::wait_for_neo4j(&config, timeout).await?;

    let graph = neo4rs::Graph::new(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
    )
    .await
    .context("Failed to connect to Neo4j")?;

    let app = router(AppState { graph });
    let listener = tokio::net::TcpListener::bind(&config.api_bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.api_bind))?;

    info!("✅ Listening on {}", config.api_bind);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
