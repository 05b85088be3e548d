pub mod seat_maps;
pub mod selection;

use axum::{http::StatusCode, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use validator::ValidationErrors;

use crate::error::SeatMapError;
use crate::seatmap::SeatMap;
use crate::AppState;

pub type ApiError = (StatusCode, Json<Value>);

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(seat_maps::routes())
        .merge(selection::routes())
}

/* ---------- helpers ---------- */

/// Ошибка ядра -> ответ. Кривые данные - 400, отказ по правилу - 409.
pub fn reject(err: SeatMapError) -> ApiError {
    let status = if err.is_rule_rejection() {
        StatusCode::CONFLICT
    } else {
        StatusCode::BAD_REQUEST
    };
    tracing::debug!("Seat map request rejected: {}", err);
    (
        status,
        Json(json!({
            "success": false,
            "code": err.code(),
            "error": err.user_message(),
            "details": err.to_string(),
        })),
    )
}

pub fn invalid(errors: ValidationErrors) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "code": "validation_failed",
            "error": errors.to_string(),
        })),
    )
}

/// Размеры схемы в пределах, заданных конфигурацией сервиса.
pub fn check_limits(state: &AppState, map: &SeatMap) -> Result<(), ApiError> {
    let limits = &state.config.seatmap;
    if map.width() > limits.max_width || map.height() > limits.max_height {
        return Err(reject(SeatMapError::InvalidDimension {
            width: map.width(),
            height: map.height(),
        }));
    }
    Ok(())
}
