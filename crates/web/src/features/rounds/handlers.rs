use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use storage::{
    dto::{
        common::ListResponse,
        round::{CreateRoundRequest, HoleResponse, RoundResponse, RoundSummaryResponse},
    },
    services::rounds,
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::AuthenticatedPlayer;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/rounds",
    request_body = CreateRoundRequest,
    responses(
        (status = 201, description = "Round created from the course catalog", body = RoundResponse),
        (status = 400, description = "Invalid request or unknown marker"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Course catalog unavailable")
    ),
    security(("basic_auth" = [])),
    tag = "rounds"
)]
pub async fn create_round(
    State(state): State<AppState>,
    Extension(AuthenticatedPlayer(player_id)): Extension<AuthenticatedPlayer>,
    Json(payload): Json<CreateRoundRequest>,
) -> Result<Response, WebError> {
    let round =
        rounds::create_round(&*state.store, &*state.catalog, player_id, payload).await?;

    Ok((StatusCode::CREATED, Json(round)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rounds",
    responses(
        (status = 200, description = "Rounds of the player, newest first", body = ListResponse<RoundResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("basic_auth" = [])),
    tag = "rounds"
)]
pub async fn list_rounds(
    State(state): State<AppState>,
    Extension(AuthenticatedPlayer(player_id)): Extension<AuthenticatedPlayer>,
) -> Result<Response, WebError> {
    let response = rounds::list_rounds(&*state.store, player_id).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rounds/{round_id}/holes",
    params(
        ("round_id" = Uuid, Path, description = "Round ID")
    ),
    responses(
        (status = 200, description = "Holes of the round by number", body = ListResponse<HoleResponse>),
        (status = 403, description = "Round belongs to another player"),
        (status = 404, description = "Round not found")
    ),
    security(("basic_auth" = [])),
    tag = "rounds"
)]
pub async fn list_round_holes(
    State(state): State<AppState>,
    Extension(AuthenticatedPlayer(player_id)): Extension<AuthenticatedPlayer>,
    Path(round_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let response = rounds::list_round_holes(&*state.store, player_id, round_id).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rounds/{round_id}/summary",
    params(
        ("round_id" = Uuid, Path, description = "Round ID")
    ),
    responses(
        (status = 200, description = "Materialized round statistics", body = RoundSummaryResponse),
        (status = 403, description = "Round belongs to another player"),
        (status = 404, description = "Round not found or not summarized yet")
    ),
    security(("basic_auth" = [])),
    tag = "rounds"
)]
pub async fn get_round_summary(
    State(state): State<AppState>,
    Extension(AuthenticatedPlayer(player_id)): Extension<AuthenticatedPlayer>,
    Path(round_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let response = rounds::get_round_summary(&*state.store, player_id, round_id).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/rounds/{round_id}/recompute",
    params(
        ("round_id" = Uuid, Path, description = "Round ID")
    ),
    responses(
        (status = 202, description = "Recompute scheduled"),
        (status = 403, description = "Round belongs to another player"),
        (status = 404, description = "Round not found")
    ),
    security(("basic_auth" = [])),
    tag = "rounds"
)]
pub async fn recompute_round(
    State(state): State<AppState>,
    Extension(AuthenticatedPlayer(player_id)): Extension<AuthenticatedPlayer>,
    Path(round_id): Path<Uuid>,
) -> Result<Response, WebError> {
    rounds::request_recompute(&*state.store, &state.recompute, player_id, round_id).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "round_id": round_id,
            "status": "scheduled"
        })),
    )
        .into_response())
}
