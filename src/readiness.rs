//! Startup gates that wait for external dependencies.
//!
//! Each gate polls its target with a trivial query every two seconds
//! until the target answers or the timeout elapses. Call the gate for
//! a dependency once, before issuing any real query against it.

use crate::config::Config;
use crate::error::PipelineError;
use neo4rs::{query, Graph};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Wait until Postgres accepts connections and answers a trivial query.
pub async fn wait_for_postgres(config: &Config, timeout: Duration) -> Result<(), PipelineError> {
    let start = Instant::now();
    let conn_string = config.postgres_conn_string();

    loop {
        match check_postgres(&conn_string).await {
            Ok(()) => {
                info!("✅ Postgres is ready");
                return Ok(());
            }
            Err(e) => {
                if start.elapsed() > timeout {
                    return Err(PipelineError::DependencyUnavailable {
                        service: "postgres",
                        timeout_secs: timeout.as_secs(),
                        cause: e.to_string(),
                    });
                }
                warn!(
                    "Postgres not ready yet: {}. Retrying in {}s...",
                    e,
                    POLL_INTERVAL.as_secs()
                );
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }
    }
}

/// Wait until Neo4j accepts Bolt connections and answers a trivial query.
pub async fn wait_for_neo4j(config: &Config, timeout: Duration) -> Result<(), PipelineError> {
    let start = Instant::now();

    loop {
        match check_neo4j(config).await {
            Ok(()) => {
                info!("✅ Neo4j is ready");
                return Ok(());
            }
            Err(e) => {
                if start.elapsed() > timeout {
                    return Err(PipelineError::DependencyUnavailable {
                        service: "neo4j",
                        timeout_secs: timeout.as_secs(),
                        cause: e.to_string(),
                    });
                }
                warn!(
                    "Neo4j not ready yet: {}. Retrying in {}s...",
                    e,
                    POLL_INTERVAL.as_secs()
                );
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }
    }
}

async fn check_postgres(conn_string: &str) -> Result<(), tokio_postgres::Error> {
    let (client, connection) = tokio_postgres::connect(conn_string, tokio_postgres::NoTls).await?;
    tokio::spawn(async move {
        let _ = connection.await;
    });
    client.simple_query("SELECT 1").await.map(|_| ())
}

async fn check_neo4j(config: &Config) -> Result<(), neo4rs::Error> {
    let graph = Graph::new(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
    )
    .await?;
    graph.run(query("RETURN 1")).await
}
