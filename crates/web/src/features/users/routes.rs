use axum::{Router, routing::post};

use super::handlers::create_user;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(create_user))
}
