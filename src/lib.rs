pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::catalog_service::CatalogService;
pub use app::network_service::NetworkService;
pub use domain::error::ServiceError;
pub use domain::hierarchy::MAX_HIERARCHY_LEVEL;
pub use domain::node::{NetworkNode, NodeLevel};
