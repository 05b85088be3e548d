use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use super::{invalid, reject, ApiError};
use crate::models::{FlatSeat, SeatId};
use crate::seatmap::{check_selection, Occupancy};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/selection/check", post(check_seat))
}

// POST /api/selection/check
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckSelectionRequest {
    #[validate(length(min = 1, max = 20000))]
    pub seats: Vec<FlatSeat>,
    pub seat_id: SeatId,
    #[serde(default)]
    pub occupancy: Occupancy,
    #[serde(default)]
    pub allow_gaps: bool,
    /// Запрос из кассы или админки.
    #[serde(default)]
    pub staff: bool,
}

pub async fn check_seat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckSelectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(invalid)?;
    let allow_gaps = req.allow_gaps || (req.staff && state.config.seatmap.allow_gap_seats_for_staff);

    check_selection(
        &req.seats,
        &req.seat_id,
        &req.occupancy,
        allow_gaps,
        state.config.seatmap.label_convention,
    )
    .map_err(reject)?;

    Ok((StatusCode::OK, Json(json!({ "allowed": true, "seatId": req.seat_id }))))
}
