//! Process configuration, supplied through the environment.

use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub postgres_host: String,
    pub postgres_db: String,
    pub postgres_user: String,
    pub postgres_password: String,
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub api_bind: String,
    pub schema_file: String,
    pub readiness_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            postgres_host: env::var("POSTGRES_HOST").unwrap_or_else(|_| "postgres".to_string()),
            postgres_db: env::var("POSTGRES_DB").unwrap_or_else(|_| "shop".to_string()),
            postgres_user: env::var("POSTGRES_USER").unwrap_or_else(|_| "postgres".to_string()),
            postgres_password: env::var("POSTGRES_PASSWORD")
                .unwrap_or_else(|_| "postgres".to_string()),
            neo4j_uri: env::var("NEO4J_URI").unwrap_or_else(|_| "bolt://neo4j:7687".to_string()),
            neo4j_user: env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string()),
            neo4j_password: env::var("NEO4J_PASSWORD").unwrap_or_else(|_| "password".to_string()),
            api_bind: env::var("API_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            schema_file: env::var("GRAPH_SCHEMA_FILE")
                .unwrap_or_else(|_| "queries.cypher".to_string()),
            readiness_timeout_secs: env::var("READINESS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
        })
    }

    /// Connection string for tokio-postgres.
    pub fn postgres_conn_string(&self) -> String {
        format!(
            "host={} dbname={} user={} password={}",
            self.postgres_host, self.postgres_db, self.postgres_user, self.postgres_password
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conn_string_carries_all_four_fields() {
        let config = Config {
            postgres_host: "db.internal".to_string(),
            postgres_db: "shop".to_string(),
            postgres_user: "etl".to_string(),
            postgres_password: "secret".to_string(),
            neo4j_uri: "bolt://neo4j:7687".to_string(),
            neo4j_user: "neo4j".to_string(),
            neo4j_password: "password".to_string(),
            api_bind: "0.0.0.0:8000".to_string(),
            schema_file: "queries.cypher".to_string(),
            readiness_timeout_secs: 120,
        };

        assert_eq!(
            config.postgres_conn_string(),
            "host=db.internal dbname=shop user=etl password=secret"
        );
    }
}
