use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    dto::hole_stat::{HoleStatRequest, HoleStatResponse},
    services::hole_stats,
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::AuthenticatedPlayer;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/rounds/{round_id}/holes/{hole_id}/stats",
    params(
        ("round_id" = Uuid, Path, description = "Round ID"),
        ("hole_id" = Uuid, Path, description = "Hole ID")
    ),
    responses(
        (status = 200, description = "Recorded stats, or empty stats for an unplayed hole", body = HoleStatResponse),
        (status = 403, description = "Round belongs to another player"),
        (status = 404, description = "Hole not found in round")
    ),
    security(("basic_auth" = [])),
    tag = "hole_stats"
)]
pub async fn get_hole_stat(
    State(state): State<AppState>,
    Extension(AuthenticatedPlayer(player_id)): Extension<AuthenticatedPlayer>,
    Path((round_id, hole_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    let response = hole_stats::get_hole_stat(&*state.store, player_id, round_id, hole_id).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    put,
    path = "/api/rounds/{round_id}/holes/{hole_id}/stats",
    params(
        ("round_id" = Uuid, Path, description = "Round ID"),
        ("hole_id" = Uuid, Path, description = "Hole ID")
    ),
    request_body = HoleStatRequest,
    responses(
        (status = 200, description = "Stats recorded; round statistics refresh in the background", body = HoleStatResponse),
        (status = 400, description = "Invalid stats"),
        (status = 403, description = "Round belongs to another player"),
        (status = 404, description = "Hole not found in round")
    ),
    security(("basic_auth" = [])),
    tag = "hole_stats"
)]
pub async fn submit_hole_stat(
    State(state): State<AppState>,
    Extension(AuthenticatedPlayer(player_id)): Extension<AuthenticatedPlayer>,
    Path((round_id, hole_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<HoleStatRequest>,
) -> Result<Response, WebError> {
    let response = hole_stats::submit_hole_stat(
        &*state.store,
        &state.recompute,
        player_id,
        round_id,
        hole_id,
        payload,
    )
    .await?;

    Ok(Json(response).into_response())
}
