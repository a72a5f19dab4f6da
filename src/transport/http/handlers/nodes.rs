//! `network-nodes` collection. Every write routes through the composite
//! writer and the hierarchy validator; the access gate runs before any of
//! these handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::transport::http::handlers::common::service_error_response;
use crate::transport::http::types::{
    json_422, ApiResponse, AppState, NodeListQuery, NodePatchRequest, NodeResponse,
    NodeWriteRequest,
};

#[utoipa::path(
    get,
    path = "/api/network-nodes",
    params(NodeListQuery),
    responses(
        (status = 200, description = "Nodes listed", body = ApiResponse),
        (status = 400, description = "Stored hierarchy violates the depth rule", body = ApiResponse),
        (status = 401, description = "Not authenticated", body = ApiResponse)
    )
)]
pub async fn list_nodes_handler(
    State(state): State<AppState>,
    Query(query): Query<NodeListQuery>,
) -> impl IntoResponse {
    match state
        .network
        .list_nodes(query.contact, query.country.as_deref())
        .await
    {
        Ok(listed) => {
            let nodes: Vec<NodeResponse> = listed.into_iter().map(NodeResponse::from).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::ok(serde_json::json!(nodes))),
            )
                .into_response()
        }
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/network-nodes/{id}",
    params(("id" = i64, Path, description = "Node id")),
    responses(
        (status = 200, description = "Node found", body = ApiResponse),
        (status = 404, description = "Node not found", body = ApiResponse)
    )
)]
pub async fn get_node_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.network.get_node(id).await {
        Ok(view) => {
            let node = NodeResponse::from(view);
            (
                StatusCode::OK,
                Json(ApiResponse::ok(serde_json::json!(node))),
            )
                .into_response()
        }
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/network-nodes",
    request_body = NodeWriteRequest,
    responses(
        (status = 201, description = "Node and nested contact created", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 404, description = "Supplier does not exist", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    )
)]
pub async fn create_node_handler(
    State(state): State<AppState>,
    request: Result<Json<NodeWriteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"name\", \"level\", \"contact\": {...}}").into_response(),
    };

    match state.network.create_node(request.into()).await {
        Ok(view) => {
            let node = NodeResponse::from(view);
            (
                StatusCode::CREATED,
                Json(ApiResponse::ok(serde_json::json!(node))),
            )
                .into_response()
        }
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/network-nodes/{id}",
    params(("id" = i64, Path, description = "Node id")),
    request_body = NodeWriteRequest,
    responses(
        (status = 200, description = "Node replaced", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 404, description = "Node not found", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    )
)]
pub async fn replace_node_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<NodeWriteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"name\", \"level\", \"contact\": {...}}").into_response(),
    };

    match state.network.update_node(id, request.into()).await {
        Ok(view) => {
            let node = NodeResponse::from(view);
            (
                StatusCode::OK,
                Json(ApiResponse::ok(serde_json::json!(node))),
            )
                .into_response()
        }
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    patch,
    path = "/api/network-nodes/{id}",
    params(("id" = i64, Path, description = "Node id")),
    request_body = NodePatchRequest,
    responses(
        (status = 200, description = "Node updated", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 404, description = "Node not found", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    )
)]
pub async fn patch_node_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<NodePatchRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "any subset of node/contact fields").into_response(),
    };

    match state.network.update_node(id, request.into()).await {
        Ok(view) => {
            let node = NodeResponse::from(view);
            (
                StatusCode::OK,
                Json(ApiResponse::ok(serde_json::json!(node))),
            )
                .into_response()
        }
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/network-nodes/{id}",
    params(("id" = i64, Path, description = "Node id")),
    responses(
        (status = 204, description = "Node, its contact and its products deleted"),
        (status = 404, description = "Node not found", body = ApiResponse)
    )
)]
pub async fn delete_node_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.network.delete_node(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}
