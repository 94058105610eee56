use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{Genre, MovieDetails},
    routes::{today, AppState},
    services::{
        search::{self, TitleMatch},
        top_movies::{self, RankedMovie, TopListRequest},
    },
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

pub async fn genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let dictionary = state.catalog.genres().await?;
    Ok(Json(dictionary.genres()))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<TitleMatch>>> {
    let titles = search::search_titles(state.catalog.as_ref(), &params.q).await?;
    Ok(Json(titles))
}

pub async fn top(
    State(state): State<AppState>,
    Query(request): Query<TopListRequest>,
) -> AppResult<Json<Vec<RankedMovie>>> {
    let ranked = top_movies::top_movies(state.catalog.as_ref(), &request, today()).await?;
    Ok(Json(ranked))
}

pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<MovieDetails>> {
    let movie = state.catalog.fetch_movie(id).await?;
    Ok(Json(movie))
}
