use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    routes::{today, AppState},
    services::{
        analysis::{self, Dashboard, Financials, MovieAnalysis},
        top_movies::TopListRequest,
    },
};

#[derive(Debug, Deserialize)]
pub struct FinancialsQuery {
    /// Comma-separated genre names
    #[serde(default)]
    genres: Option<String>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    Query(request): Query<TopListRequest>,
) -> AppResult<Json<Dashboard>> {
    let dashboard = analysis::build_dashboard(state.catalog.as_ref(), &request, today()).await?;
    Ok(Json(dashboard))
}

pub async fn financials(
    State(state): State<AppState>,
    Query(params): Query<FinancialsQuery>,
) -> AppResult<Json<Financials>> {
    let genre_ids = match params.genres.as_deref() {
        Some(raw) => {
            let dictionary = state.catalog.genres().await?;
            dictionary.resolve_names(raw.split(',').map(str::trim).filter(|s| !s.is_empty()))?
        }
        None => Vec::new(),
    };

    let financials = analysis::build_financials(state.catalog.as_ref(), &genre_ids).await?;
    Ok(Json(financials))
}

pub async fn movie(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<MovieAnalysis>> {
    let analysis = analysis::analyze_movie(state.catalog.as_ref(), id).await?;
    Ok(Json(analysis))
}
