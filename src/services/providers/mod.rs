//! Movie catalog abstraction
//!
//! Everything the service knows about movies comes through [`MovieCatalog`].
//! The TMDB implementation lives in [`tmdb`]; tests substitute mocks or
//! in-memory fakes.
use crate::{
    error::{AppError, AppResult},
    models::{
        DiscoverQuery, GenreDictionary, KeywordRef, MovieDetails, MovieRecord, MovieSummary,
        Page, Person, PersonRole, TimeWindow,
    },
};

pub mod tmdb;

/// Discover pages walked at most while collecting recommendation candidates
pub const MAX_CANDIDATE_PAGES: u32 = 10;

/// Trait for movie metadata catalogs
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Genre name <-> id dictionary
    async fn genres(&self) -> AppResult<GenreDictionary>;

    /// Search movies by title, most popular first
    async fn search_movies(&self, query: &str) -> AppResult<Vec<MovieSummary>>;

    /// Search people by name, most popular first
    ///
    /// `PersonRole::Crew` excludes people known primarily for acting.
    async fn search_people(&self, query: &str, role: PersonRole) -> AppResult<Vec<Person>>;

    /// Search catalog keywords by name
    async fn search_keywords(&self, query: &str) -> AppResult<Vec<KeywordRef>>;

    /// One page of the discover listing for the given query
    async fn discover(&self, query: &DiscoverQuery) -> AppResult<Page<MovieSummary>>;

    /// One page of trending movies for the window
    async fn trending(&self, window: TimeWindow, page: u32) -> AppResult<Page<MovieSummary>>;

    /// Full details of one movie, including credits and keywords
    async fn fetch_movie(&self, id: u64) -> AppResult<MovieDetails>;

    /// A single hydrated movie record
    async fn fetch(&self, id: u64) -> AppResult<MovieRecord> {
        Ok(self.fetch_movie(id).await?.record)
    }

    /// Fetch details for multiple movies in parallel
    ///
    /// Results keep the order of `ids`. Individual failures are logged and
    /// skipped; the call fails only when nothing could be fetched.
    async fn fetch_movies_batch(&self, ids: Vec<u64>) -> AppResult<Vec<MovieDetails>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut tasks = Vec::with_capacity(ids.len());

        for id in ids {
            let provider = self.clone_for_task();
            let task = tokio::spawn(async move { provider.fetch_movie(id).await });
            tasks.push((id, task));
        }

        let mut results = Vec::new();
        let mut errors = Vec::new();

        for (id, task) in tasks {
            match task.await {
                Ok(Ok(details)) => results.push(details),
                Ok(Err(e)) => {
                    tracing::error!(movie_id = id, error = %e, "Movie fetch failed");
                    errors.push(e);
                }
                Err(e) => {
                    tracing::error!(movie_id = id, error = %e, "Task join error");
                    errors.push(AppError::Internal(e.to_string()));
                }
            }
        }

        if !errors.is_empty() {
            tracing::warn!(
                success_count = results.len(),
                error_count = errors.len(),
                "Partial movie fetch failure"
            );
        }

        if results.is_empty() && !errors.is_empty() {
            return Err(AppError::ExternalApi(
                "Failed to fetch any movie details".to_string(),
            ));
        }

        Ok(results)
    }

    /// Candidate pool for recommendations
    ///
    /// Walks the discover listing for `genre_ids` (most popular first,
    /// optionally restricted to an original language) and hydrates each
    /// hit until `count` records are collected or the listing runs out.
    /// Records keep the catalog's popularity order.
    async fn fetch_candidates(
        &self,
        genre_ids: Vec<u32>,
        language: Option<String>,
        count: usize,
    ) -> AppResult<Vec<MovieRecord>> {
        let mut candidates: Vec<MovieRecord> = Vec::with_capacity(count);
        if count == 0 {
            return Ok(candidates);
        }

        let mut query = DiscoverQuery::sorted_by("popularity.desc");
        query.with_genres = genre_ids;
        query.with_original_language = language;

        let mut page = 1;
        while candidates.len() < count && page <= MAX_CANDIDATE_PAGES {
            query.page = page;
            let listing = self.discover(&query).await?;
            if listing.results.is_empty() {
                break;
            }

            let needed = count - candidates.len();
            let ids: Vec<u64> = listing.results.iter().take(needed).map(|m| m.id).collect();
            let hydrated = self.fetch_movies_batch(ids).await?;
            candidates.extend(hydrated.into_iter().map(|details| details.record));

            if page >= listing.total_pages {
                break;
            }
            page += 1;
        }

        tracing::info!(
            provider = self.name(),
            requested = count,
            collected = candidates.len(),
            pages = page,
            "Recommendation candidates collected"
        );

        Ok(candidates)
    }

    /// Clone provider for parallel task execution
    ///
    /// Required because providers need to be moved into tokio tasks.
    fn clone_for_task(&self) -> Box<dyn MovieCatalog>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
