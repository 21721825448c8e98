use axum::{Router, middleware, routing::get};

use super::handlers::{get_hole_stat, submit_hole_stat};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

/// Nested under `/api/rounds`.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/:round_id/holes/:hole_id/stats",
            get(get_hole_stat).put(submit_hole_stat),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
