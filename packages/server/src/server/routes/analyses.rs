//! GET /api/analyses/:id

use axum::{
    extract::{Extension, Path},
    Json,
};
use uuid::Uuid;

use crate::domains::analysis::models::AnalysisRecord;
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

pub async fn analysis_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisRecord>, ApiError> {
    state
        .deps
        .store
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Analysis {} not found", id)))
}
