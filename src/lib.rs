//! Postgres-to-Neo4j ETL and graph-backed product recommendations.
//!
//! The `etl` binary runs the one-shot pipeline (readiness gate, schema
//! bootstrap, extraction, transformation, batched load); the `api`
//! binary serves the recommendation queries over HTTP.

pub mod api;
pub mod chunker;
pub mod config;
pub mod error;
pub mod extract;
pub mod load;
pub mod pipeline;
pub mod queries;
pub mod readiness;
pub mod schema;
pub mod transform;
