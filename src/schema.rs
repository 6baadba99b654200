//! One-time graph schema setup: identity constraints plus an optional
//! operator-supplied statement file. Everything here is idempotent and
//! runs before any data load; a failure is fatal to the pipeline run.

use crate::error::PipelineError;
use neo4rs::{query, Graph};
use std::path::Path;
use tracing::info;

/// One uniqueness constraint per node label's identity attribute.
const CONSTRAINTS: [&str; 4] = [
    "CREATE CONSTRAINT customer_id IF NOT EXISTS FOR (c:Customer) REQUIRE c.id IS UNIQUE",
    "CREATE CONSTRAINT product_id  IF NOT EXISTS FOR (p:Product)  REQUIRE p.id IS UNIQUE",
    "CREATE CONSTRAINT order_id    IF NOT EXISTS FOR (o:Order)    REQUIRE o.id IS UNIQUE",
    "CREATE CONSTRAINT category_pk IF NOT EXISTS FOR (c:Category) REQUIRE c.name IS UNIQUE",
];

/// Apply the uniqueness constraints. Repeated calls are no-ops.
pub async fn apply_constraints(graph: &Graph) -> Result<(), PipelineError> {
    for stmt in CONSTRAINTS {
        graph
            .run(query(stmt))
            .await
            .map_err(PipelineError::SchemaBootstrap)?;
    }
    info!("Applied {} uniqueness constraints", CONSTRAINTS.len());
    Ok(())
}

/// Execute an operator-supplied Cypher file one statement at a time.
/// A missing file is a no-op; each statement must itself be idempotent
/// since fragments are executed independently and never deduplicated.
pub async fn run_statement_file(graph: &Graph, path: &Path) -> Result<(), PipelineError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No schema file at {}, skipping", path.display());
            return Ok(());
        }
        Err(e) => {
            return Err(PipelineError::SchemaFile {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    let statements = split_statements(&text);
    for stmt in &statements {
        graph
            .run(query(stmt))
            .await
            .map_err(PipelineError::SchemaBootstrap)?;
    }
    if !statements.is_empty() {
        info!(
            "Executed {} statements from {}",
            statements.len(),
            path.display()
        );
    }
    Ok(())
}

/// Purely syntactic statement splitting: drop full-line `//` comments
/// and `:browser`-directive lines, split the rest on `;`, and discard
/// empty fragments.
pub fn split_statements(text: &str) -> Vec<String> {
    let cleaned: Vec<&str> = text
        .lines()
        .filter(|line| {
            let l = line.trim();
            !l.is_empty() && !l.starts_with("//") && !l.starts_with(':')
        })
        .collect();

    cleaned
        .join("\n")
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminator_and_drops_empty_fragments() {
        let text = "CREATE INDEX a;\nCREATE INDEX b;\n;\n";
        assert_eq!(split_statements(text), vec!["CREATE INDEX a", "CREATE INDEX b"]);
    }

    #[test]
    fn strips_comments_directives_and_blank_lines() {
        let text = "// schema for the shop graph\n\
                    :use shop\n\
                    \n\
                    CREATE INDEX product_name IF NOT EXISTS\n\
                    FOR (p:Product) ON (p.name);\n";
        assert_eq!(
            split_statements(text),
            vec!["CREATE INDEX product_name IF NOT EXISTS\nFOR (p:Product) ON (p.name)"]
        );
    }

    #[test]
    fn keeps_multiline_statements_together() {
        let text = "MERGE (a:Thing {id: 1})\nSET a.name = 'x';\nMERGE (b:Thing {id: 2});";
        let statements = split_statements(text);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains('\n'));
    }

    #[test]
    fn empty_input_yields_no_statements() {
        assert!(split_statements("").is_empty());
        assert!(split_statements("// only a comment\n:only a directive\n").is_empty());
    }

    #[test]
    fn every_constraint_is_if_not_exists() {
        for stmt in CONSTRAINTS {
            assert!(stmt.contains("IF NOT EXISTS"), "{}", stmt);
            assert!(stmt.contains("IS UNIQUE"), "{}", stmt);
        }
    }
}
