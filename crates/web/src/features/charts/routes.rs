use axum::{Router, middleware, routing::get};

use super::handlers::{line_chart, pie_chart};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/line", get(line_chart))
        .route("/pie", get(pie_chart))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
