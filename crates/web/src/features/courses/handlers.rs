use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::dto::catalog::{CatalogCourse, CatalogMarker, CourseSearchParams};

use crate::error::WebError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseSearchParams),
    responses(
        (status = 200, description = "Catalog courses matching the name", body = Vec<CatalogCourse>),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Course catalog unavailable")
    ),
    security(("basic_auth" = [])),
    tag = "courses"
)]
pub async fn search_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseSearchParams>,
) -> Result<Response, WebError> {
    let courses = state.catalog.search_courses(params.name.as_deref()).await?;
    tracing::debug!(count = courses.len(), "Catalog search returned courses");

    Ok(Json(courses).into_response())
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/markers",
    params(
        ("course_id" = i64, Path, description = "Catalog course ID")
    ),
    responses(
        (status = 200, description = "Markers of the course by slope then rating", body = Vec<CatalogMarker>),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Course catalog unavailable")
    ),
    security(("basic_auth" = [])),
    tag = "courses"
)]
pub async fn list_markers(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<Response, WebError> {
    let markers = state.catalog.list_markers(course_id).await?;

    Ok(Json(markers).into_response())
}
