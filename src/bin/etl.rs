use anyhow::Result;
use shop_graph::config::Config;
use shop_graph::pipeline;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("🚀 ETL pipeline starting...");

    let config = Config::from_env()?;
    let report = pipeline::run(&config).await?;

    for pass in report.passes() {
        info!(
            "📊 {}: attempted={} written={} skipped={}",
            pass.pass,
            pass.attempted,
            pass.written,
            pass.skipped()
        );
    }
    info!("✅ ETL pipeline complete");
    Ok(())
}
