//! TMDB (The Movie Database) v3 provider
//!
//! Endpoints used:
//! - `/genre/movie/list` for the genre dictionary
//! - `/search/movie`, `/search/person`, `/search/keyword` for lookups
//! - `/discover/movie` and `/trending/movie/{window}` for listings
//! - `/movie/{id}?append_to_response=credits,keywords` for details
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        ApiGenreList, ApiMovieDetails, DiscoverQuery, GenreDictionary, KeywordRef, MovieDetails,
        MovieSummary, Page, Person, PersonRole, TimeWindow,
    },
    services::providers::MovieCatalog,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

const MOVIE_SEARCH_LIMIT: usize = 20;
const PEOPLE_SEARCH_LIMIT: usize = 50;
const KEYWORD_SEARCH_LIMIT: usize = 50;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            cache,
        }
    }

    /// GET `path` with the auth and language parameters plus `params`
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDB resource {}", path)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(path = %path, bytes = response_text.len(), "Raw TMDB API response");

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }

    async fn search<T: DeserializeOwned>(&self, kind: &str, query: &str) -> AppResult<Vec<T>> {
        let page: Page<T> = self
            .get_json(
                &format!("/search/{}", kind),
                &[
                    ("query", query.to_string()),
                    ("page", "1".to_string()),
                    ("include_adult", "false".to_string()),
                ],
            )
            .await?;
        Ok(page.results)
    }
}

fn require_query(query: &str) -> AppResult<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Most popular first, capped at the search limit
fn rank_movies(mut movies: Vec<MovieSummary>) -> Vec<MovieSummary> {
    movies.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    movies.truncate(MOVIE_SEARCH_LIMIT);
    movies
}

/// Most popular first; crew searches drop people known for acting
fn rank_people(mut people: Vec<Person>, role: PersonRole) -> Vec<Person> {
    if role == PersonRole::Crew {
        people.retain(|p| p.known_for_department.as_deref() != Some("Acting"));
    }
    people.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    people.truncate(PEOPLE_SEARCH_LIMIT);
    people
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbProvider {
    async fn genres(&self) -> AppResult<GenreDictionary> {
        let genres: AppResult<ApiGenreList> = cached!(
            self.cache,
            CacheKey::Genres,
            async move {
                let list: ApiGenreList = self.get_json("/genre/movie/list", &[]).await?;
                tracing::info!(genres = list.genres.len(), provider = "tmdb", "Genres fetched");
                Ok::<_, AppError>(list)
            }
        );

        GenreDictionary::new(genres?.genres)
    }

    async fn search_movies(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        let query = require_query(query)?;

        cached!(
            self.cache,
            CacheKey::MovieSearch(query.to_string()),
            async move {
                let movies = rank_movies(self.search::<MovieSummary>("movie", query).await?);

                tracing::info!(
                    query = %query,
                    results = movies.len(),
                    provider = "tmdb",
                    "Movie search completed"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }

    async fn search_people(&self, query: &str, role: PersonRole) -> AppResult<Vec<Person>> {
        let query = require_query(query)?;

        let people: AppResult<Vec<Person>> = cached!(
            self.cache,
            CacheKey::PersonSearch(query.to_string()),
            async move { self.search::<Person>("person", query).await }
        );

        let people = rank_people(people?, role);
        tracing::info!(
            query = %query,
            role = ?role,
            results = people.len(),
            provider = "tmdb",
            "People search completed"
        );

        Ok(people)
    }

    async fn search_keywords(&self, query: &str) -> AppResult<Vec<KeywordRef>> {
        let query = require_query(query)?;

        cached!(
            self.cache,
            CacheKey::KeywordSearch(query.to_string()),
            async move {
                let mut keywords = self.search::<KeywordRef>("keyword", query).await?;
                keywords.truncate(KEYWORD_SEARCH_LIMIT);
                Ok::<_, AppError>(keywords)
            }
        )
    }

    async fn discover(&self, query: &DiscoverQuery) -> AppResult<Page<MovieSummary>> {
        let params = query.to_params();

        cached!(
            self.cache,
            CacheKey::Discover(query.cache_fragment()),
            async move {
                let page: Page<MovieSummary> = self.get_json("/discover/movie", &params).await?;

                tracing::info!(
                    page = page.page,
                    total_pages = page.total_pages,
                    results = page.results.len(),
                    provider = "tmdb",
                    "Discover page fetched"
                );

                Ok::<_, AppError>(page)
            }
        )
    }

    async fn trending(&self, window: TimeWindow, page: u32) -> AppResult<Page<MovieSummary>> {
        let page = page.max(1);

        cached!(
            self.cache,
            CacheKey::Trending(window, page),
            async move {
                self.get_json::<Page<MovieSummary>>(
                    &format!("/trending/movie/{}", window),
                    &[("page", page.to_string())],
                )
                .await
            }
        )
    }

    async fn fetch_movie(&self, id: u64) -> AppResult<MovieDetails> {
        cached!(
            self.cache,
            CacheKey::Movie(id),
            async move {
                let api: ApiMovieDetails = self
                    .get_json(
                        &format!("/movie/{}", id),
                        &[("append_to_response", "credits,keywords".to_string())],
                    )
                    .await
                    .map_err(|e| match e {
                        AppError::NotFound(_) => AppError::NotFound(format!("Movie {}", id)),
                        other => other,
                    })?;

                let details = MovieDetails::from(api);
                tracing::info!(
                    movie_id = id,
                    genres = details.record.genres.len(),
                    keywords = details.record.keywords.len(),
                    provider = "tmdb",
                    "Movie details fetched"
                );

                Ok::<_, AppError>(details)
            }
        )
    }

    fn clone_for_task(&self) -> Box<dyn MovieCatalog> {
        Box::new(self.clone())
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, popularity: f64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            release_date: None,
            genre_ids: vec![],
            popularity,
            vote_average: 0.0,
            vote_count: 0,
            overview: None,
            poster_path: None,
        }
    }

    fn person(id: u64, department: &str, popularity: f64) -> Person {
        Person {
            id,
            name: format!("Person {}", id),
            known_for_department: Some(department.to_string()),
            popularity,
        }
    }

    #[test]
    fn test_require_query_rejects_blank() {
        assert!(matches!(require_query("   "), Err(AppError::InvalidInput(_))));
        assert_eq!(require_query("  Shrek ").unwrap(), "Shrek");
    }

    #[test]
    fn test_rank_movies_sorts_by_popularity_and_caps() {
        let movies: Vec<MovieSummary> = (0..30).map(|i| movie(i, i as f64)).collect();
        let ranked = rank_movies(movies);
        assert_eq!(ranked.len(), MOVIE_SEARCH_LIMIT);
        assert_eq!(ranked[0].id, 29);
        assert_eq!(ranked[19].id, 10);
    }

    #[test]
    fn test_rank_people_crew_excludes_actors() {
        let people = vec![
            person(1, "Acting", 90.0),
            person(2, "Directing", 10.0),
            person(3, "Writing", 30.0),
        ];
        let crew = rank_people(people.clone(), PersonRole::Crew);
        let ids: Vec<u64> = crew.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2]);

        let cast = rank_people(people, PersonRole::Cast);
        assert_eq!(cast.len(), 3);
        assert_eq!(cast[0].id, 1);
    }

    #[test]
    fn test_search_page_deserialization() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 5140, "name": "Wes Craven", "known_for_department": "Directing", "popularity": 12.3},
                {"id": 5151, "name": "Neve Campbell", "known_for_department": "Acting", "popularity": 20.1}
            ],
            "total_pages": 1,
            "total_results": 2
        }"#;

        let page: Page<Person> = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].name, "Wes Craven");
    }

    #[test]
    fn test_genre_list_deserialization() {
        let json = r#"{"genres": [{"id": 28, "name": "Action"}, {"id": 16, "name": "Animation"}]}"#;
        let list: ApiGenreList = serde_json::from_str(json).unwrap();
        let dictionary = GenreDictionary::new(list.genres).unwrap();
        assert_eq!(dictionary.id_of("Animation"), Some(16));
    }

    #[tokio::test]
    async fn test_provider_trims_trailing_slash() {
        let client = crate::db::create_redis_client("redis://localhost:6379").unwrap();
        let (cache, _handle) = Cache::new(client, "test").await;
        let provider = TmdbProvider::new(
            cache,
            "key".to_string(),
            "https://api.themoviedb.org/3/".to_string(),
            "en-US".to_string(),
        );
        assert_eq!(provider.api_url, "https://api.themoviedb.org/3");
        assert_eq!(provider.name(), "tmdb");
    }
}
