//! HTTP surface for the recommendation service.
//!
//! The graph connection pool is built once at process start and
//! injected into every handler through axum state; each request uses
//! it for exactly one query. A backend failure is isolated to the
//! request that hit it and never crashes the server.

use crate::error::QueryError;
use crate::queries;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use neo4rs::Graph;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::error;

/// Shared server state: the graph pool, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub graph: Graph,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/recommendations/:customer_id", get(recommendations_handler))
        .route("/similar/:product_id", get(similar_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LimitParam {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HealthResponse {
    fn ok() -> Self {
        Self {
            status: "ok",
            detail: None,
        }
    }

    fn error(detail: String) -> Self {
        Self {
            status: "error",
            detail: Some(detail),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/health", "/recommendations/{customer_id}", "/similar/{product_id}"],
    }))
}

/// Reports backend failure structurally instead of raising: the body
/// says ok or error, the status is 200 either way.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match queries::ping(&state.graph).await {
        Ok(()) => Json(HealthResponse::ok()),
        Err(e) => Json(HealthResponse::error(e.to_string())),
    }
}

async fn recommendations_handler(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
    Query(params): Query<LimitParam>,
) -> Response {
    let limit = match queries::validate_limit(params.limit) {
        Ok(limit) => limit,
        Err(e) => return client_error(e),
    };
    match queries::recommend_for_customer(&state.graph, customer_id, limit).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => backend_error(e),
    }
}

async fn similar_handler(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Query(params): Query<LimitParam>,
) -> Response {
    let limit = match queries::validate_limit(params.limit) {
        Ok(limit) => limit,
        Err(e) => return client_error(e),
    };
    match queries::similar_products(&state.graph, product_id, limit).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => backend_error(e),
    }
}

fn client_error(e: QueryError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

fn backend_error(e: QueryError) -> Response {
    error!("graph query failed: {}", e);
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::Recommendation;

    #[test]
    fn health_ok_serializes_without_detail() {
        let json = serde_json::to_value(HealthResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok"}));
    }

    #[test]
    fn health_error_carries_the_detail() {
        let json =
            serde_json::to_value(HealthResponse::error("bolt handshake failed".to_string()))
                .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "detail": "bolt handshake failed"})
        );
    }

    #[test]
    fn recommendation_rows_use_the_documented_field_names() {
        let row = Recommendation {
            product_id: 42,
            product_name: "Graph Databases".to_string(),
            score: 7,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "product_id": 42,
                "product_name": "Graph Databases",
                "score": 7,
            })
        );
    }

    #[test]
    fn limit_param_is_optional() {
        let params: LimitParam = serde_json::from_str("{}").unwrap();
        assert_eq!(params.limit, None);

        let params: LimitParam = serde_json::from_str(r#"{"limit": 10}"#).unwrap();
        assert_eq!(params.limit, Some(10));
    }
}
