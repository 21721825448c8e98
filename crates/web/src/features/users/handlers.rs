use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::user::{CreateUserRequest, UserResponse},
    services::rounds,
};

use crate::error::WebError;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Username already taken")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Response, WebError> {
    let user = rounds::create_user(&*state.store, payload).await?;

    Ok((StatusCode::CREATED, Json(user)).into_response())
}
