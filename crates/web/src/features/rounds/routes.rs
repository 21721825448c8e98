use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{
    create_round, get_round_summary, list_round_holes, list_rounds, recompute_round,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_rounds).post(create_round))
        .route("/:round_id/holes", get(list_round_holes))
        .route("/:round_id/summary", get(get_round_summary))
        .route("/:round_id/recompute", post(recompute_round))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
