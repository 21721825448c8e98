use axum::{Router, middleware, routing::get};

use super::handlers::{list_markers, search_courses};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(search_courses))
        .route("/:course_id/markers", get(list_markers))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
