pub mod auth;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod common;
    pub mod health;
    pub mod nodes;
    pub mod products;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
