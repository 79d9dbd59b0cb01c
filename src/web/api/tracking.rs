use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::tracker::{Frame, TrackedSummary};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddRequest {
    /// NORAD catalog number or other source identifier, e.g. "25544".
    pub id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemoveResponse {
    pub removed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClockResponse {
    pub time: DateTime<Utc>,
}

#[utoipa::path(
    post,
    path = "/api/tracked",
    request_body = AddRequest,
    responses(
        (status = 201, description = "Satellite is now tracked", body = TrackedSummary),
        (status = 400, description = "Empty identifier", body = ErrorResponse),
        (status = 409, description = "Already tracked", body = ErrorResponse),
        (status = 502, description = "Element fetch failed", body = ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn add_tracked(
    State(state): State<AppState>,
    Json(request): Json<AddRequest>,
) -> ApiResult<(StatusCode, Json<TrackedSummary>)> {
    let summary = state.controller.request_add(&request.id).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

#[utoipa::path(
    delete,
    path = "/api/tracked/{id}",
    params(("id" = String, Path, description = "Tracked identifier")),
    responses(
        (status = 200, description = "Removal result; succeeds for unknown ids", body = RemoveResponse)
    ),
    tag = "tracking"
)]
pub async fn remove_tracked(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<RemoveResponse> {
    Json(RemoveResponse {
        removed: state.controller.request_remove(&id),
    })
}

#[utoipa::path(
    get,
    path = "/api/tracked",
    responses(
        (status = 200, description = "Tracked satellites in insertion order", body = Vec<TrackedSummary>)
    ),
    tag = "tracking"
)]
pub async fn list_tracked(State(state): State<AppState>) -> Json<Vec<TrackedSummary>> {
    Json(state.controller.tracked())
}

#[utoipa::path(
    get,
    path = "/api/clock",
    responses(
        (status = 200, description = "Current simulated time", body = ClockResponse)
    ),
    tag = "tracking"
)]
pub async fn clock(State(state): State<AppState>) -> Json<ClockResponse> {
    Json(ClockResponse {
        time: *state.clock.borrow(),
    })
}

#[utoipa::path(
    get,
    path = "/api/positions",
    responses(
        (status = 200, description = "Positions from the latest tick, null before the first", body = Option<Frame>)
    ),
    tag = "tracking"
)]
pub async fn positions(State(state): State<AppState>) -> Json<Option<Frame>> {
    Json(state.latest.get())
}
