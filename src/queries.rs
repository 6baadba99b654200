//! Read-time recommendation traversals.
//!
//! Both operations are pure reads over whatever the loader has
//! committed so far; they need no coordination with an in-flight load.
//! Unknown ids yield empty results, never errors.

use crate::error::QueryError;
use neo4rs::{query, Graph, Query};
use serde::Serialize;

pub const DEFAULT_LIMIT: i64 = 5;
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 50;

/// A scored product recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub product_id: i64,
    pub product_name: String,
    pub score: i64,
}

/// Validate the caller-supplied limit before touching the graph.
/// `None` means the default.
pub fn validate_limit(limit: Option<i64>) -> Result<i64, QueryError> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(QueryError::InvalidLimit(limit));
    }
    Ok(limit)
}

/// Products bought by customers who share at least one product with
/// the target customer. The target's own products are excluded, as is
/// the target customer; the score counts co-purchase paths, so a
/// customer overlapping through several orders contributes more than
/// once.
const RECOMMEND_FOR_CUSTOMER: &str = "
    MATCH (c:Customer {id: $customer_id})-[:PLACED]->(:Order)-[:CONTAINS]->(p:Product)
    MATCH (p)<-[:CONTAINS]-(:Order)<-[:PLACED]-(other:Customer)
    WHERE other <> c
    MATCH (other)-[:PLACED]->(:Order)-[:CONTAINS]->(rec:Product)
    WHERE NOT (c)-[:PLACED]->(:Order)-[:CONTAINS]->(:Product {id: rec.id})
    RETURN rec.id AS product_id, rec.name AS product_name, count(*) AS score
    ORDER BY score DESC
    LIMIT $limit";

/// Products that co-occur with the target product in the same order,
/// excluding the target itself, scored by co-occurrence count.
const SIMILAR_PRODUCTS: &str = "
    MATCH (p:Product {id: $product_id})<-[:CONTAINS]-(o:Order)-[:CONTAINS]->(rec:Product)
    WHERE rec <> p
    RETURN rec.id AS product_id, rec.name AS product_name, count(*) AS score
    ORDER BY score DESC
    LIMIT $limit";

pub async fn recommend_for_customer(
    graph: &Graph,
    customer_id: i64,
    limit: i64,
) -> Result<Vec<Recommendation>, QueryError> {
    let q = query(RECOMMEND_FOR_CUSTOMER)
        .param("customer_id", customer_id)
        .param("limit", limit);
    collect(graph, q).await
}

pub async fn similar_products(
    graph: &Graph,
    product_id: i64,
    limit: i64,
) -> Result<Vec<Recommendation>, QueryError> {
    let q = query(SIMILAR_PRODUCTS)
        .param("product_id", product_id)
        .param("limit", limit);
    collect(graph, q).await
}

/// Trivial query used by the health endpoint and the readiness gate's
/// serving-side counterpart.
pub async fn ping(graph: &Graph) -> Result<(), QueryError> {
    graph.run(query("RETURN 1")).await?;
    Ok(())
}

async fn collect(graph: &Graph, q: Query) -> Result<Vec<Recommendation>, QueryError> {
    let mut result = graph.execute(q).await?;
    let mut rows = Vec::new();
    while let Some(row) = result.next().await? {
        rows.push(Recommendation {
            product_id: row.get("product_id").unwrap_or_default(),
            product_name: row.get("product_name").unwrap_or_default(),
            score: row.get("score").unwrap_or_default(),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_to_five() {
        assert_eq!(validate_limit(None).unwrap(), DEFAULT_LIMIT);
    }

    #[test]
    fn limit_bounds_are_inclusive() {
        assert_eq!(validate_limit(Some(1)).unwrap(), 1);
        assert_eq!(validate_limit(Some(50)).unwrap(), 50);
    }

    #[test]
    fn out_of_range_limits_are_client_errors() {
        for bad in [0, 51, -3, 1000] {
            match validate_limit(Some(bad)) {
                Err(QueryError::InvalidLimit(v)) => assert_eq!(v, bad),
                other => panic!("expected InvalidLimit for {}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn recommendations_exclude_the_customers_own_products() {
        assert!(RECOMMEND_FOR_CUSTOMER
            .contains("WHERE NOT (c)-[:PLACED]->(:Order)-[:CONTAINS]->(:Product {id: rec.id})"));
        assert!(RECOMMEND_FOR_CUSTOMER.contains("WHERE other <> c"));
    }

    #[test]
    fn similarity_excludes_the_target_product() {
        assert!(SIMILAR_PRODUCTS.contains("WHERE rec <> p"));
    }

    #[test]
    fn both_queries_order_by_score_and_honor_the_limit() {
        for cypher in [RECOMMEND_FOR_CUSTOMER, SIMILAR_PRODUCTS] {
            assert!(cypher.contains("ORDER BY score DESC"));
            assert!(cypher.contains("LIMIT $limit"));
        }
    }
}
