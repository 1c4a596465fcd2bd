//! Node Endpoints
//!
//! # Endpoints
//!
//! - `GET /api/health` - Health check endpoint
//! - `GET /api/nodes?search=&category=&tags=` - List nodes, filtered
//! - `GET /api/nodes/facets` - Categories and tags available for filtering
//! - `POST /api/nodes` - Create a node
//! - `GET /api/nodes/:id` - Get a node by ID
//! - `PATCH /api/nodes/:id` - Patch a node (immutable fields are ignored)
//! - `DELETE /api/nodes/:id` - Delete a node

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
    routing::get,
    Router,
};
use folio_core::filter::{FilterFacets, FilterQuery, NodeFilter};
use folio_core::models::{NewNode, Node};
use folio_core::services::GatewayResponse;
use serde::Serialize;
use serde_json::Value;

use crate::api::HttpError;
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Id of a freshly created node
#[derive(Debug, Serialize)]
pub struct CreatedNode {
    pub id: String,
}

/// Health check endpoint
///
/// ```bash
/// curl http://localhost:3001/api/health
/// ```
async fn health_check() -> Json<GatewayResponse<HealthStatus>> {
    Json(GatewayResponse::success(
        "health",
        "Server is running",
        HealthStatus {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    ))
}

/// List all nodes, narrowed by the optional filter parameters
///
/// ```bash
/// curl "http://localhost:3001/api/nodes?search=logo&category=Branding&tags=vector,print"
/// ```
async fn list_nodes(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Json<GatewayResponse<Vec<Node>>>, HttpError> {
    let Query(query) = query.map_err(|e| HttpError::query_rejection("nodes", e))?;
    let filter = NodeFilter::from(query);

    let nodes = state
        .nodes
        .list()
        .await
        .map_err(|e| HttpError::gateway("nodes", e))?;
    let nodes = filter.retain(nodes);

    Ok(Json(GatewayResponse::success(
        "nodes",
        "Nodes retrieved successfully",
        nodes,
    )))
}

async fn list_facets(
    State(state): State<AppState>,
) -> Result<Json<GatewayResponse<FilterFacets>>, HttpError> {
    let nodes = state
        .nodes
        .list()
        .await
        .map_err(|e| HttpError::gateway("nodes", e))?;

    Ok(Json(GatewayResponse::success(
        "nodes",
        "Facets retrieved successfully",
        FilterFacets::from_nodes(&nodes),
    )))
}

/// Create a node
///
/// ```bash
/// curl -X POST http://localhost:3001/api/nodes \
///   -H "Content-Type: application/json" \
///   -d '{"nodeTitle":"Logo Design","nodeDescription":"Brand work","createdBy":"user-1"}'
/// ```
async fn create_node(
    State(state): State<AppState>,
    payload: Result<Json<NewNode>, JsonRejection>,
) -> Result<Json<GatewayResponse<CreatedNode>>, HttpError> {
    let Json(input) = payload.map_err(|e| HttpError::json_rejection("node", e))?;

    let id = state
        .nodes
        .create(input)
        .await
        .map_err(|e| HttpError::gateway("node", e))?;

    Ok(Json(GatewayResponse::success(
        "node",
        "Node created successfully",
        CreatedNode { id },
    )))
}

async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GatewayResponse<Node>>, HttpError> {
    let node = state
        .nodes
        .get_by_id(&id)
        .await
        .map_err(|e| HttpError::gateway("node", e))?;

    Ok(Json(GatewayResponse::success(
        "node",
        "Node retrieved successfully",
        node,
    )))
}

/// Patch a node with a raw JSON object
///
/// `id`, `createdAt` and `createdBy` are dropped from the body before it is
/// applied; other unknown keys are rejected.
async fn update_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GatewayResponse<()>>, HttpError> {
    let Json(patch) = payload.map_err(|e| HttpError::json_rejection("node", e))?;

    state
        .nodes
        .update_from_json(&id, patch)
        .await
        .map_err(|e| HttpError::gateway("node", e))?;

    Ok(Json(GatewayResponse::done("node", "Node updated successfully")))
}

async fn delete_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GatewayResponse<()>>, HttpError> {
    state
        .nodes
        .delete(&id)
        .await
        .map_err(|e| HttpError::gateway("node", e))?;

    Ok(Json(GatewayResponse::done("node", "Node deleted successfully")))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/nodes", get(list_nodes).post(create_node))
        .route("/api/nodes/facets", get(list_facets))
        .route(
            "/api/nodes/:id",
            get(get_node).patch(update_node).delete(delete_node),
        )
        .with_state(state)
}
