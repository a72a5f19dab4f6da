use crate::transport::http::auth;
use crate::transport::http::handlers::{health, nodes, products};
use crate::transport::http::types::{
    ApiResponse, AppState, NodePatchRequest, NodeResponse, NodeWriteRequest, ProductPatchRequest,
    ProductWriteRequest,
};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

use crate::domain::contact::{Contact, ContactInput, ContactPatch};
use crate::domain::node::NodeLevel;
use crate::domain::product::Product;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        nodes::list_nodes_handler,
        nodes::get_node_handler,
        nodes::create_node_handler,
        nodes::replace_node_handler,
        nodes::patch_node_handler,
        nodes::delete_node_handler,
        products::list_products_handler,
        products::get_product_handler,
        products::create_product_handler,
        products::replace_product_handler,
        products::patch_product_handler,
        products::delete_product_handler
    ),
    components(schemas(
        ApiResponse,
        Contact,
        ContactInput,
        ContactPatch,
        NodeLevel,
        NodeWriteRequest,
        NodePatchRequest,
        NodeResponse,
        Product,
        ProductWriteRequest,
        ProductPatchRequest
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    // Everything under /api sits behind the access gate; /health does not.
    let gated = Router::new()
        .route(
            "/api/network-nodes",
            get(nodes::list_nodes_handler).post(nodes::create_node_handler),
        )
        .route(
            "/api/network-nodes/:id",
            get(nodes::get_node_handler)
                .put(nodes::replace_node_handler)
                .patch(nodes::patch_node_handler)
                .delete(nodes::delete_node_handler),
        )
        .route(
            "/api/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route(
            "/api/products/:id",
            get(products::get_product_handler)
                .put(products::replace_product_handler)
                .patch(products::patch_product_handler)
                .delete(products::delete_product_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::require_active_employee,
        ));

    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .merge(gated)
        .with_state(app_state)
}
