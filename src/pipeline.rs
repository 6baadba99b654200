//! The ETL pipeline: readiness gate, schema bootstrap, extraction,
//! transformation, batched load. Strictly sequential; any error aborts
//! the run.

use crate::config::Config;
use crate::error::PipelineError;
use crate::extract;
use crate::load::{self, BatchSizes, LoadReport};
use crate::readiness;
use crate::schema;
use crate::transform;
use neo4rs::Graph;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub async fn run(config: &Config) -> Result<LoadReport, PipelineError> {
    let timeout = Duration::from_secs(config.readiness_timeout_secs);

    info!("Waiting for dependencies...");
    readiness::wait_for_postgres(config, timeout).await?;
    readiness::wait_for_neo4j(config, timeout).await?;

    info!("📄 Reading from Postgres...");
    let tables = {
        // The relational connection lives only as long as the four
        // reads; it is gone before the first graph write.
        let client = extract::connect(&config.postgres_conn_string()).await?;
        extract::extract_all(&client).await?
    };

    let categories = transform::derive_categories(&tables.products);
    info!("Derived {} categories", categories.len());

    info!("💾 Writing to Neo4j...");
    let graph = Graph::new(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
    )
    .await
    .map_err(PipelineError::GraphConnect)?;

    schema::run_statement_file(&graph, Path::new(&config.schema_file)).await?;
    schema::apply_constraints(&graph).await?;

    load::load_all(&graph, &categories, &tables, BatchSizes::default()).await
}
