use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use storage::dto::user::TokenResponse;

use crate::error::WebError;
use crate::middleware::auth::{authenticate, basic_credentials, basic_token};
use crate::state::AppState;

/// Checks Basic credentials and hands back the token to present on other
/// endpoints.
#[utoipa::path(
    post,
    path = "/api/login",
    responses(
        (status = 200, description = "Credentials accepted", body = TokenResponse),
        (status = 401, description = "Missing or invalid credentials")
    ),
    security(("basic_auth" = [])),
    tag = "users"
)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let (username, password) = basic_credentials(&headers)?;
    let user = authenticate(&state, &username, &password).await?;
    tracing::info!(user_id = %user.user_id, "User logged in");

    Ok(Json(TokenResponse {
        token: basic_token(&user.username, &password),
    })
    .into_response())
}
