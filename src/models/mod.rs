use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod discover;
pub mod genre;
pub mod movie;

pub use discover::{DiscoverFilters, DiscoverQuery, PersonRole, TimeWindow, TopCategory};
pub use genre::{Genre, GenreDictionary};
pub use movie::{
    CastMember, CrewMember, KeywordRef, MovieDetails, MovieRecord, MovieSummary, Person,
    ScoredCandidate, SpokenLanguage,
};

use movie::deserialize_release_date;

// ============================================================================
// TMDB API Types
// ============================================================================

/// One page of a paginated TMDB listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
}

/// Response of GET /genre/movie/list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiGenreList {
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCredits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiKeywords {
    #[serde(default)]
    pub keywords: Vec<KeywordRef>,
}

/// Response of GET /movie/{id}?append_to_response=credits,keywords
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "deserialize_release_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub credits: ApiCredits,
    #[serde(default)]
    pub keywords: ApiKeywords,
}

impl From<ApiMovieDetails> for MovieDetails {
    fn from(api: ApiMovieDetails) -> Self {
        let record = MovieRecord {
            id: api.id,
            title: api.title,
            release_date: api.release_date,
            genres: api.genres.into_iter().map(|g| g.name).collect(),
            keywords: api.keywords.keywords.into_iter().map(|k| k.name).collect(),
            popularity: api.popularity,
            vote_average: api.vote_average,
            vote_count: api.vote_count,
            budget: api.budget,
            revenue: api.revenue,
            overview: api.overview.filter(|o| !o.is_empty()),
            poster_path: api.poster_path,
            original_language: api.original_language,
        };

        MovieDetails {
            record,
            original_title: api.original_title,
            tagline: api.tagline.filter(|t| !t.is_empty()),
            runtime: api.runtime.filter(|r| *r > 0),
            spoken_languages: api.spoken_languages,
            cast: api.credits.cast,
            crew: api.credits.crew,
        }
    }
}
