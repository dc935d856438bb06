use axum::Router;

pub mod materials;
pub mod system;

/// Router for the `/api` endpoint families.
pub fn router() -> Router {
    Router::new().nest("/api/materials", materials::router())
}
