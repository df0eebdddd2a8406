pub mod relay;
pub mod routes;

pub use routes::{create_router, AppState};
