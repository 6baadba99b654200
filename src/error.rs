//! Error taxonomy for the pipeline and the query service.

use thiserror::Error;

/// Errors that abort a pipeline run. None of these are retried within
/// a run; batches committed before a `Load` failure remain applied.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{service} not ready after {timeout_secs}s: {cause}")]
    DependencyUnavailable {
        service: &'static str,
        timeout_secs: u64,
        cause: String,
    },

    #[error("failed to connect to the graph store: {0}")]
    GraphConnect(#[source] neo4rs::Error),

    #[error("failed to read schema file {path}: {source}")]
    SchemaFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("schema bootstrap failed: {0}")]
    SchemaBootstrap(#[source] neo4rs::Error),

    #[error("failed to read from Postgres: {0}")]
    Extraction(#[from] tokio_postgres::Error),

    #[error("load failed in {pass} pass: {source}")]
    Load {
        pass: &'static str,
        #[source]
        source: neo4rs::Error,
    },
}

impl PipelineError {
    pub(crate) fn load(pass: &'static str, source: neo4rs::Error) -> Self {
        PipelineError::Load { pass, source }
    }
}

/// Errors surfaced by the recommendation query service. `InvalidLimit`
/// is a client input failure raised before any query is issued;
/// `Backend` is isolated to the request that hit it.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("limit must be between 1 and 50, got {0}")]
    InvalidLimit(i64),

    #[error("graph query failed: {0}")]
    Backend(#[from] neo4rs::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_unavailable_carries_last_cause() {
        let err = PipelineError::DependencyUnavailable {
            service: "postgres",
            timeout_secs: 120,
            cause: "connection refused".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("postgres"));
        assert!(msg.contains("120"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn invalid_limit_names_the_offending_value() {
        assert_eq!(
            QueryError::InvalidLimit(51).to_string(),
            "limit must be between 1 and 50, got 51"
        );
    }
}
