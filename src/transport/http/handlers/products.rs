//! `products` collection. Flat fields, no nested-writer behavior; the access
//! gate applies to every operation.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::transport::http::handlers::common::service_error_response;
use crate::transport::http::types::{
    json_422, ApiResponse, AppState, ProductPatchRequest, ProductWriteRequest,
};

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Products listed", body = ApiResponse),
        (status = 401, description = "Not authenticated", body = ApiResponse)
    )
)]
pub async fn list_products_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.catalog.list_products().await {
        Ok(products) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!(products))),
        )
            .into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ApiResponse),
        (status = 404, description = "Product not found", body = ApiResponse)
    )
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.catalog.get_product(id).await {
        Ok(product) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!(product))),
        )
            .into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductWriteRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 404, description = "Owning node does not exist", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    )
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    request: Result<Json<ProductWriteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, "{\"name\", \"model\", \"market_date\", \"network_node\"}")
                .into_response()
        }
    };

    match state.catalog.create_product(request.into()).await {
        Ok(product) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok(serde_json::json!(product))),
        )
            .into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductWriteRequest,
    responses(
        (status = 200, description = "Product replaced", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 404, description = "Product not found", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    )
)]
pub async fn replace_product_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<ProductWriteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, "{\"name\", \"model\", \"market_date\", \"network_node\"}")
                .into_response()
        }
    };

    match state.catalog.update_product(id, request.into()).await {
        Ok(product) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!(product))),
        )
            .into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductPatchRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 404, description = "Product not found", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    )
)]
pub async fn patch_product_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<ProductPatchRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "any subset of product fields").into_response(),
    };

    match state.catalog.update_product(id, request.into()).await {
        Ok(product) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!(product))),
        )
            .into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = ApiResponse)
    )
)]
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.catalog.delete_product(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}
