// src/bin/api_server.rs

use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;
use trade_network_api::infra::config;
use trade_network_api::storage;
use trade_network_api::transport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("connecting to Postgres and provisioning schema");
    let pool = storage::connect_pool().await?;

    let app_state = transport::http::AppState::new(pool);

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url(
                "/api-docs/openapi.json",
                <transport::http::ApiDoc as utoipa::OpenApi>::openapi(),
            ),
        )
        .layer(cors);

    let bind_addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(%bind_addr, "API server listening");
    info!("Swagger UI available at /swagger-ui");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}
