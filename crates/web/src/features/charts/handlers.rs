use axum::{
    Extension, Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use storage::{
    dto::chart::{ChartPoint, LineChartFilter, PieChartFilter, PieSlice},
    services::charts,
};

use crate::error::WebError;
use crate::middleware::auth::AuthenticatedPlayer;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/charts/line",
    params(LineChartFilter),
    responses(
        (status = 200, description = "One point per round, oldest first", body = Vec<ChartPoint>),
        (status = 400, description = "Conflicting or malformed time filters")
    ),
    security(("basic_auth" = [])),
    tag = "charts"
)]
pub async fn line_chart(
    State(state): State<AppState>,
    Extension(AuthenticatedPlayer(player_id)): Extension<AuthenticatedPlayer>,
    Query(filter): Query<LineChartFilter>,
) -> Result<Response, WebError> {
    let now = Utc::now().naive_utc();
    let points = charts::line_series(&*state.store, player_id, &filter, now).await?;

    Ok(Json(points).into_response())
}

#[utoipa::path(
    get,
    path = "/api/charts/pie",
    params(PieChartFilter),
    responses(
        (status = 200, description = "Outcome counts across all rounds", body = Vec<PieSlice>)
    ),
    security(("basic_auth" = [])),
    tag = "charts"
)]
pub async fn pie_chart(
    State(state): State<AppState>,
    Extension(AuthenticatedPlayer(player_id)): Extension<AuthenticatedPlayer>,
    Query(filter): Query<PieChartFilter>,
) -> Result<Response, WebError> {
    let slices = charts::pie_breakdown(&*state.store, player_id, filter.kind).await?;

    Ok(Json(slices).into_response())
}
