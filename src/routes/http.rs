// GET/POST handlers

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::aggregation;
use crate::dashboard::SourceStatus;
use crate::models::{AggregateRow, BucketWidth, MetricSeries, Statistics, parse_dimensions};
use crate::version::{NAME, VERSION};

/// JSON `{ "error": ... }` with a status code.
pub(super) struct ApiError(StatusCode, String);

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        ApiError(StatusCode::BAD_REQUEST, message.into())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({ "error": self.1 }))).into_response()
    }
}

/// GET /version: package name and version.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/status: load state of both sources.
pub(super) async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dashboard.current().await.status())
}

/// GET /api/dashboard: full view for the current load.
pub(super) async fn dashboard_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dashboard.view().await)
}

/// POST /api/refresh: re-read both files.
pub(super) async fn refresh_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let sources = state.dashboard.refresh().await.map_err(|e| {
        tracing::warn!(error = %e, "refresh failed");
        ApiError(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(Json(sources.status()))
}

#[derive(Debug, Deserialize)]
pub(super) struct AggregateQuery {
    /// Bucket width; omitted means group by dimensions only.
    interval_secs: Option<u32>,
    /// Comma-separated subset of node, worker, action.
    #[serde(default)]
    dims: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AggregateResponse {
    source: SourceStatus,
    rows: Vec<AggregateRow>,
}

/// GET /api/aggregate: count, mean latency and success rate for any dimension split.
pub(super) async fn aggregate_handler(
    State(state): State<AppState>,
    query: Result<Query<AggregateQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let dimensions = parse_dimensions(&query.dims).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let width = match query.interval_secs {
        Some(secs) => Some(
            BucketWidth::from_secs(secs)
                .ok_or_else(|| ApiError::bad_request("interval_secs must be > 0"))?,
        ),
        None => None,
    };
    let sources = state.dashboard.current().await;
    let rows = sources
        .operations
        .records()
        .map(|records| aggregation::aggregate(records, width, &dimensions, Statistics::ALL))
        .unwrap_or_default();
    Ok(Json(AggregateResponse {
        source: sources.operations.status(),
        rows,
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct SeriesQuery {
    key: String,
    range_minutes: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SeriesResponse {
    source: SourceStatus,
    series: Option<MetricSeries>,
}

/// GET /api/metrics/series: raw points of one metric over the trailing window.
pub(super) async fn metric_series_handler(
    State(state): State<AppState>,
    query: Result<Query<SeriesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    if query.key.is_empty() {
        return Err(ApiError::bad_request("key must be non-empty"));
    }
    let range = match query.range_minutes {
        Some(0) => return Err(ApiError::bad_request("range_minutes must be > 0")),
        Some(m) => Some(TimeDelta::minutes(i64::from(m))),
        None => state.dashboard.settings().default_range,
    };
    let sources = state.dashboard.current().await;
    let series = sources
        .metrics
        .records()
        .map(|snapshots| aggregation::metric_series(snapshots, &query.key, range));
    Ok(Json(SeriesResponse {
        source: sources.metrics.status(),
        series,
    }))
}
