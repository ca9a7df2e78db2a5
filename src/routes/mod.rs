// HTTP routes: JSON for the browser dashboard

mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::dashboard::Dashboard;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) dashboard: Arc<Dashboard>,
}

pub fn app(dashboard: Arc<Dashboard>) -> Router {
    let state = AppState { dashboard };
    Router::new()
        .route("/", get(|| async { crate::version::banner() })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/status", get(http::status_handler)) // GET /api/status
        .route("/api/dashboard", get(http::dashboard_handler)) // GET /api/dashboard
        .route("/api/aggregate", get(http::aggregate_handler)) // GET /api/aggregate?interval_secs=&dims=
        .route("/api/metrics/series", get(http::metric_series_handler)) // GET /api/metrics/series?key=&range_minutes=
        .route("/api/refresh", post(http::refresh_handler)) // POST /api/refresh
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
