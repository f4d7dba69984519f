//! API routes module

pub mod health;
pub mod users;

use axum::Router;
use axum_helpers::health_router;

use crate::state::AppState;

/// All routes served by the app, before docs and middleware are added
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/users", users::router(state))
        .merge(health::router(state.clone()))
        .merge(health_router(state.config.app.clone()))
}
