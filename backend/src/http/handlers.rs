//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! [`TransitEngine`](crate::services::TransitEngine).

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::NaiveDate;

use super::dto::{
    CacheMaintenanceResponse, HealthResponse, PositionsResponse, TimingRequest, TimingResponse,
    TransitRequest, TransitResponse, ValidateTimingRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::TimingValidation;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Longest date range a single transit request may span, in days.
pub const MAX_RANGE_DAYS: i64 = 3660;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let cache = if state.engine.cache().health_check().await {
        "connected"
    } else {
        "unavailable"
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        cache: cache.to_string(),
    }))
}

// =============================================================================
// Transits
// =============================================================================

/// POST /v1/transits
///
/// Consolidated transit periods of a natal chart over an inclusive date range.
pub async fn calculate_transits(
    State(state): State<AppState>,
    payload: Result<Json<TransitRequest>, JsonRejection>,
) -> HandlerResult<TransitResponse> {
    let Json(request) = payload?;

    let span = (request.end_date - request.start_date).num_days();
    if span > MAX_RANGE_DAYS {
        return Err(AppError::BadRequest(format!(
            "date range spans {} days; the limit is {}",
            span, MAX_RANGE_DAYS
        )));
    }

    let periods = state
        .engine
        .calculate_transit_periods(&request.chart, request.start_date, request.end_date)
        .await?;
    let total = periods.len();

    Ok(Json(TransitResponse { periods, total }))
}

// =============================================================================
// Timing
// =============================================================================

/// POST /v1/timing
pub async fn calculate_timing(
    State(state): State<AppState>,
    payload: Result<Json<TimingRequest>, JsonRejection>,
) -> HandlerResult<TimingResponse> {
    let Json(request) = payload?;
    let purpose = request.purpose();

    let windows = state
        .engine
        .calculate_auspicious_timing(request.date, purpose, &request.influences)
        .await?;

    Ok(Json(TimingResponse {
        date: request.date,
        purpose,
        windows,
    }))
}

/// POST /v1/timing/validate
pub async fn validate_timing(
    State(state): State<AppState>,
    payload: Result<Json<ValidateTimingRequest>, JsonRejection>,
) -> HandlerResult<TimingValidation> {
    let Json(request) = payload?;
    let validation = state
        .engine
        .validate_timing(request.proposed_time, &request.requirements())
        .await?;
    Ok(Json(validation))
}

// =============================================================================
// Positions
// =============================================================================

/// GET /v1/positions/{date}
///
/// `date` is an ISO calendar date, e.g. `2024-06-21`.
pub async fn get_positions(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> HandlerResult<PositionsResponse> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|e| AppError::BadRequest(format!("Invalid date '{}': {}", date, e)))?;

    let positions = state.engine.positions_at(date).await?;
    let panchang = state.engine.panchang_for(date).await?;

    Ok(Json(PositionsResponse {
        date,
        positions,
        panchang,
    }))
}

// =============================================================================
// Cache maintenance
// =============================================================================

/// POST /v1/cache/sweep
pub async fn sweep_cache(State(state): State<AppState>) -> HandlerResult<CacheMaintenanceResponse> {
    let removed = state.engine.cache().sweep_expired().await;
    Ok(Json(CacheMaintenanceResponse { removed }))
}

/// DELETE /v1/cache
pub async fn clear_cache(State(state): State<AppState>) -> HandlerResult<CacheMaintenanceResponse> {
    let removed = state.engine.cache().clear().await;
    Ok(Json(CacheMaintenanceResponse { removed }))
}
