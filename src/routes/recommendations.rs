use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    routes::AppState,
    services::recommendations::{self, Recommendations},
};

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub top_n: Option<usize>,
    pub candidates: Option<usize>,
}

/// Handler for the per-movie recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(params): Query<RecommendationParams>,
) -> AppResult<Json<Recommendations>> {
    let recommendations = recommendations::recommend(
        state.catalog.as_ref(),
        id,
        params.top_n.unwrap_or(recommendations::DEFAULT_TOP_N),
        params
            .candidates
            .unwrap_or(recommendations::DEFAULT_CANDIDATE_COUNT),
    )
    .await?;
    Ok(Json(recommendations))
}
