//! seat_maps.rs
//!
//! Обработчики редактора схемы зала. Сервис ничего не хранит: клиент
//! присылает текущую схему и получает новую, сохранение остаётся за
//! бэкендом бронирования.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use super::{check_limits, invalid, reject, ApiError};
use crate::models::{FlatSeat, RoomId};
use crate::seatmap::{
    apply_tool, from_flat_seats_with, plan_sync, to_flat_seats, SeatMap, Target, Tool,
};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seat-maps/empty", post(build_empty))
        .route("/seat-maps/hydrate", post(hydrate))
        .route("/seat-maps/flatten", post(flatten))
        .route("/seat-maps/apply", post(apply))
        .route("/seat-maps/sync-plan", post(sync_plan))
}

// POST /api/seat-maps/empty
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmptyGridRequest {
    pub width: usize,
    pub height: usize,
    pub room_id: RoomId,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub room_name: String,
}

pub async fn build_empty(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EmptyGridRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(invalid)?;
    let map = SeatMap::empty(
        req.width,
        req.height,
        req.room_id,
        req.room_name,
        state.config.seatmap.label_convention,
    )
    .map_err(reject)?;
    check_limits(&state, &map)?;
    Ok((StatusCode::CREATED, Json(map)))
}

// POST /api/seat-maps/hydrate
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HydrateRequest {
    pub room_id: RoomId,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub room_name: String,
    #[validate(length(max = 20000))]
    pub seats: Vec<FlatSeat>,
}

pub async fn hydrate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HydrateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(invalid)?;
    let mut hydrated = from_flat_seats_with(
        &req.seats,
        &req.room_id,
        state.config.seatmap.label_convention,
    )
    .map_err(reject)?;
    check_limits(&state, &hydrated.map)?;
    hydrated.map.set_room_name(req.room_name);

    if !hydrated.link_fallbacks.is_empty() {
        tracing::warn!(
            "Room {}: {} couple seats needed link fallback",
            req.room_id,
            hydrated.link_fallbacks.len()
        );
    }
    Ok((StatusCode::OK, Json(hydrated)))
}

// POST /api/seat-maps/flatten
#[derive(Debug, Deserialize)]
pub struct FlattenRequest {
    pub map: SeatMap,
}

pub async fn flatten(Json(req): Json<FlattenRequest>) -> impl IntoResponse {
    let seats = to_flat_seats(&req.map);
    (StatusCode::OK, Json(json!({ "seats": seats })))
}

// POST /api/seat-maps/apply
#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub map: SeatMap,
    pub tool: Tool,
    pub target: Target,
}

pub async fn apply(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ApplyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    check_limits(&state, &req.map)?;
    let mut map = req.map;
    let report = apply_tool(&mut map, req.tool, &req.target).map_err(reject)?;
    let violations = map.link_violations();
    if !violations.is_empty() {
        // Может прийти только из присланной клиентом схемы
        tracing::warn!(
            "Room {} has {} inconsistent double-seat links",
            map.room_id(),
            violations.len()
        );
    }
    Ok((
        StatusCode::OK,
        Json(json!({
            "map": map,
            "report": report,
            "linkViolations": violations,
        })),
    ))
}

// POST /api/seat-maps/sync-plan
#[derive(Debug, Deserialize, Validate)]
pub struct SyncPlanRequest {
    #[validate(length(max = 20000))]
    pub before: Vec<FlatSeat>,
    #[validate(length(max = 20000))]
    pub after: Vec<FlatSeat>,
}

pub async fn sync_plan(Json(req): Json<SyncPlanRequest>) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(invalid)?;
    Ok((StatusCode::OK, Json(plan_sync(&req.before, &req.after))))
}
