use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{DiscoverFilters, KeywordRef, Person, PersonRole},
    routes::{today, AppState},
    services::{
        discovery::{self, DiscoverResults},
        search,
    },
};

#[derive(Debug, Deserialize)]
pub struct PeopleQuery {
    #[serde(default)]
    q: String,
    #[serde(default)]
    role: PersonRole,
}

#[derive(Debug, Deserialize)]
pub struct KeywordQuery {
    #[serde(default)]
    q: String,
}

pub async fn discover(
    State(state): State<AppState>,
    Query(filters): Query<DiscoverFilters>,
) -> AppResult<Json<DiscoverResults>> {
    let results = discovery::discover_movies(state.catalog.as_ref(), &filters, today()).await?;
    Ok(Json(results))
}

pub async fn people(
    State(state): State<AppState>,
    Query(params): Query<PeopleQuery>,
) -> AppResult<Json<Vec<Person>>> {
    let people = search::search_people(state.catalog.as_ref(), &params.q, params.role).await?;
    Ok(Json(people))
}

pub async fn keywords(
    State(state): State<AppState>,
    Query(params): Query<KeywordQuery>,
) -> AppResult<Json<Vec<KeywordRef>>> {
    let keywords = search::search_keywords(state.catalog.as_ref(), &params.q).await?;
    Ok(Json(keywords))
}
