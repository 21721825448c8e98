use axum::Router;

use crate::features::{charts, courses, hole_stats, login, rounds, users};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let rounds =
        rounds::routes::routes(state.clone()).merge(hole_stats::routes::routes(state.clone()));

    Router::new()
        .nest("/api/users", users::routes::routes())
        .nest("/api/login", login::routes::routes())
        .nest("/api/courses", courses::routes::routes(state.clone()))
        .nest("/api/rounds", rounds)
        .nest("/api/charts", charts::routes::routes(state.clone()))
        .with_state(state)
}
