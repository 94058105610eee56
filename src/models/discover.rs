use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};
use crate::models::GenreDictionary;

/// Typed parameters for the catalog's `/discover/movie` endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoverQuery {
    pub sort_by: Option<String>,
    pub with_genres: Vec<u32>,
    pub vote_count_gte: Option<u64>,
    pub vote_average_gte: Option<f64>,
    pub release_date_gte: Option<NaiveDate>,
    pub release_date_lte: Option<NaiveDate>,
    pub with_original_language: Option<String>,
    pub with_cast: Vec<u64>,
    pub with_crew: Vec<u64>,
    pub with_keywords: Vec<u64>,
    pub without_keywords: Vec<u64>,
    pub runtime_gte: Option<u32>,
    pub runtime_lte: Option<u32>,
    pub include_adult: bool,
    pub page: u32,
}

fn join_ids<T: Display>(ids: &[T]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl DiscoverQuery {
    /// Query sorted by the given key, page 1
    pub fn sorted_by(sort_by: &str) -> Self {
        Self {
            sort_by: Some(sort_by.to_string()),
            page: 1,
            ..Self::default()
        }
    }

    /// Query-string pairs in a stable order (also used as the cache key)
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(sort_by) = &self.sort_by {
            params.push(("sort_by", sort_by.clone()));
        }
        if !self.with_genres.is_empty() {
            params.push(("with_genres", join_ids(&self.with_genres)));
        }
        if let Some(min_votes) = self.vote_count_gte {
            params.push(("vote_count.gte", min_votes.to_string()));
        }
        if let Some(min_rating) = self.vote_average_gte {
            params.push(("vote_average.gte", min_rating.to_string()));
        }
        if let Some(from) = self.release_date_gte {
            params.push(("primary_release_date.gte", from.to_string()));
        }
        if let Some(to) = self.release_date_lte {
            params.push(("primary_release_date.lte", to.to_string()));
        }
        if let Some(language) = &self.with_original_language {
            params.push(("with_original_language", language.clone()));
        }
        if !self.with_cast.is_empty() {
            params.push(("with_cast", join_ids(&self.with_cast)));
        }
        if !self.with_crew.is_empty() {
            params.push(("with_crew", join_ids(&self.with_crew)));
        }
        if !self.with_keywords.is_empty() {
            params.push(("with_keywords", join_ids(&self.with_keywords)));
        }
        if !self.without_keywords.is_empty() {
            params.push(("without_keywords", join_ids(&self.without_keywords)));
        }
        if let Some(min_runtime) = self.runtime_gte {
            params.push(("with_runtime.gte", min_runtime.to_string()));
        }
        if let Some(max_runtime) = self.runtime_lte {
            params.push(("with_runtime.lte", max_runtime.to_string()));
        }
        params.push(("include_adult", self.include_adult.to_string()));
        params.push(("page", self.page.max(1).to_string()));

        params
    }

    /// Canonical string form of the parameters
    pub fn cache_fragment(&self) -> String {
        self.to_params()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Curated "top" list categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopCategory {
    #[default]
    TopRated,
    Popular,
    New,
}

impl TopCategory {
    /// Builds the discover query for this category
    ///
    /// Top rated only includes movies already released as of `today`.
    pub fn query(self, genre_id: Option<u32>, min_votes: u64, today: NaiveDate) -> DiscoverQuery {
        let mut query = match self {
            TopCategory::TopRated => {
                let mut q = DiscoverQuery::sorted_by("vote_average.desc");
                q.release_date_lte = Some(today);
                q
            }
            TopCategory::Popular => DiscoverQuery::sorted_by("popularity.desc"),
            TopCategory::New => DiscoverQuery::sorted_by("primary_release_date.desc"),
        };
        query.vote_count_gte = Some(min_votes);
        query.with_genres = genre_id.into_iter().collect();
        query
    }
}

/// Trending window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Day,
    Week,
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeWindow::Day => write!(f, "day"),
            TimeWindow::Week => write!(f, "week"),
        }
    }
}

/// Which kind of people a search should return
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonRole {
    #[default]
    Cast,
    Crew,
}

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;
const MAX_RUNTIME: u32 = 400;
const NEW_RELEASE_DAYS: i64 = 30;

fn default_year_from() -> i32 {
    2016
}

fn default_year_to() -> i32 {
    2026
}

fn default_min_rating() -> f64 {
    6.5
}

fn default_min_votes() -> u64 {
    1000
}

fn default_runtime_min() -> u32 {
    60
}

fn default_runtime_max() -> u32 {
    240
}

fn default_page() -> u32 {
    1
}

/// User-facing filter form, as accepted from a query string
///
/// List-valued fields are comma separated: genre names for `genres`,
/// catalog ids for `cast`, `crew`, `keywords` and `without_keywords`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DiscoverFilters {
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default = "default_year_from")]
    pub year_from: i32,
    #[serde(default = "default_year_to")]
    pub year_to: i32,
    #[serde(default = "default_min_rating")]
    pub min_rating: f64,
    #[serde(default = "default_min_votes")]
    pub min_votes: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub crew: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub without_keywords: Option<String>,
    #[serde(default = "default_runtime_min")]
    pub runtime_min: u32,
    #[serde(default = "default_runtime_max")]
    pub runtime_max: u32,
    #[serde(default)]
    pub popular_only: bool,
    #[serde(default)]
    pub include_adult: bool,
    #[serde(default)]
    pub trending: Option<TimeWindow>,
    #[serde(default)]
    pub new_releases: bool,
    #[serde(default = "default_page")]
    pub page: u32,
}

impl Default for DiscoverFilters {
    fn default() -> Self {
        Self {
            genres: None,
            year_from: default_year_from(),
            year_to: default_year_to(),
            min_rating: default_min_rating(),
            min_votes: default_min_votes(),
            language: None,
            cast: None,
            crew: None,
            keywords: None,
            without_keywords: None,
            runtime_min: default_runtime_min(),
            runtime_max: default_runtime_max(),
            popular_only: false,
            include_adult: false,
            trending: None,
            new_releases: false,
            page: default_page(),
        }
    }
}

fn split_list(raw: &Option<String>) -> impl Iterator<Item = &str> {
    raw.as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_ids(field: &str, raw: &Option<String>) -> AppResult<Vec<u64>> {
    split_list(raw)
        .map(|s| {
            s.parse::<u64>().map_err(|_| {
                AppError::InvalidInput(format!("{} must be a list of numeric ids, got '{}'", field, s))
            })
        })
        .collect()
}

impl DiscoverFilters {
    /// Range and format checks shared by the discover and trending paths
    pub fn validate(&self) -> AppResult<()> {
        if self.page == 0 {
            return Err(AppError::InvalidInput("page must be at least 1".to_string()));
        }
        if !(0.0..=10.0).contains(&self.min_rating) {
            return Err(AppError::InvalidInput(
                "min_rating must be between 0 and 10".to_string(),
            ));
        }
        if self.runtime_min > self.runtime_max || self.runtime_max > MAX_RUNTIME {
            return Err(AppError::InvalidInput(format!(
                "runtime range must satisfy 0 <= runtime_min <= runtime_max <= {}",
                MAX_RUNTIME
            )));
        }
        let years_out_of_range =
            self.year_from > self.year_to || self.year_from < MIN_YEAR || self.year_to > MAX_YEAR;
        if !self.new_releases && years_out_of_range {
            return Err(AppError::InvalidInput(format!(
                "year range must satisfy {} <= year_from <= year_to <= {}",
                MIN_YEAR, MAX_YEAR
            )));
        }
        if let Some(language) = &self.language {
            if language.len() != 2 || !language.chars().all(|c| c.is_ascii_lowercase()) {
                return Err(AppError::InvalidInput(format!(
                    "language must be a two-letter ISO 639-1 code, got '{}'",
                    language
                )));
            }
        }

        let excluded = parse_ids("without_keywords", &self.without_keywords)?;
        let conflicting: Vec<String> = parse_ids("keywords", &self.keywords)?
            .into_iter()
            .filter(|id| excluded.contains(id))
            .map(|id| id.to_string())
            .collect();
        if !conflicting.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "keywords {} are both required and excluded",
                conflicting.join(",")
            )));
        }
        Ok(())
    }

    /// Validates the form and translates it into a discover query
    pub fn to_query(&self, genres: &GenreDictionary, today: NaiveDate) -> AppResult<DiscoverQuery> {
        self.validate()?;

        let sort_by = if self.popular_only {
            "popularity.desc"
        } else {
            "vote_average.desc"
        };

        let (release_date_gte, release_date_lte) = if self.new_releases {
            (Some(today - Duration::days(NEW_RELEASE_DAYS)), Some(today))
        } else {
            (
                NaiveDate::from_ymd_opt(self.year_from, 1, 1),
                NaiveDate::from_ymd_opt(self.year_to, 12, 31),
            )
        };

        Ok(DiscoverQuery {
            sort_by: Some(sort_by.to_string()),
            with_genres: genres.resolve_names(split_list(&self.genres))?,
            vote_count_gte: Some(self.min_votes),
            vote_average_gte: Some(self.min_rating),
            release_date_gte,
            release_date_lte,
            with_original_language: self.language.clone(),
            with_cast: parse_ids("cast", &self.cast)?,
            with_crew: parse_ids("crew", &self.crew)?,
            with_keywords: parse_ids("keywords", &self.keywords)?,
            without_keywords: parse_ids("without_keywords", &self.without_keywords)?,
            runtime_gte: Some(self.runtime_min),
            runtime_lte: Some(self.runtime_max),
            include_adult: self.include_adult,
            page: self.page,
        })
    }
}
