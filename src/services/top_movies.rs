use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{GenreDictionary, MovieSummary, TopCategory},
    services::providers::MovieCatalog,
};

pub const MAX_TOP_LIMIT: usize = 20;
pub const DEFAULT_TOP_MIN_VOTES: u64 = 1000;

fn default_limit() -> usize {
    MAX_TOP_LIMIT
}

fn default_min_votes() -> u64 {
    DEFAULT_TOP_MIN_VOTES
}

/// Query parameters for a top list
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TopListRequest {
    #[serde(default)]
    pub category: TopCategory,
    /// Genre name, resolved through the genre dictionary
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_min_votes")]
    pub min_votes: u64,
}

impl Default for TopListRequest {
    fn default() -> Self {
        Self {
            category: TopCategory::default(),
            genre: None,
            limit: default_limit(),
            min_votes: default_min_votes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedMovie {
    pub rank: usize,
    #[serde(flatten)]
    pub movie: MovieSummary,
    pub label: String,
    pub genres: Vec<String>,
}

fn genre_filter(genres: &GenreDictionary, name: Option<&str>) -> AppResult<Option<u32>> {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        None => Ok(None),
        Some(name) => genres
            .id_of(name)
            .map(Some)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown genre '{}'", name))),
    }
}

/// The raw listing behind a top list
pub async fn top_listing(
    catalog: &dyn MovieCatalog,
    request: &TopListRequest,
    today: NaiveDate,
) -> AppResult<(Vec<MovieSummary>, GenreDictionary)> {
    if request.limit == 0 || request.limit > MAX_TOP_LIMIT {
        return Err(AppError::InvalidInput(format!(
            "limit must be between 1 and {}",
            MAX_TOP_LIMIT
        )));
    }

    let genres = catalog.genres().await?;
    let genre_id = genre_filter(&genres, request.genre.as_deref())?;
    let query = request.category.query(genre_id, request.min_votes, today);

    let mut movies = catalog.discover(&query).await?.results;
    movies.truncate(request.limit);

    tracing::info!(
        category = ?request.category,
        genre = ?request.genre,
        results = movies.len(),
        "Top list fetched"
    );

    Ok((movies, genres))
}

/// Ranked top list with genre names attached to each entry
pub async fn top_movies(
    catalog: &dyn MovieCatalog,
    request: &TopListRequest,
    today: NaiveDate,
) -> AppResult<Vec<RankedMovie>> {
    let (movies, genres) = top_listing(catalog, request, today).await?;

    Ok(movies
        .into_iter()
        .enumerate()
        .map(|(i, movie)| RankedMovie {
            rank: i + 1,
            label: movie.label(),
            genres: genres.names_for(&movie.genre_ids),
            movie,
        })
        .collect())
}
