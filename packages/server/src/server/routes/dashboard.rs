//! GET /api/dashboard?limit=N

use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::Deserialize;

use crate::domains::analysis::actions::{load_dashboard, DashboardView, DEFAULT_DASHBOARD_LIMIT};
use crate::server::app::AxumAppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    limit: Option<usize>,
}

pub async fn dashboard_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<DashboardQuery>,
) -> Json<DashboardView> {
    let limit = query.limit.unwrap_or(DEFAULT_DASHBOARD_LIMIT);
    Json(load_dashboard(&state.deps.store, limit).await)
}
