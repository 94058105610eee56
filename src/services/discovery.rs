use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    error::AppResult,
    models::{DiscoverFilters, MovieSummary},
    services::providers::MovieCatalog,
};

pub const DISCOVER_RESULT_LIMIT: usize = 20;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiscoverResults {
    pub page: u32,
    pub total_pages: u32,
    pub movies: Vec<MovieSummary>,
}

/// Runs the filter form against the catalog
///
/// A trending window bypasses the discover filters entirely and returns
/// the trending listing for that window.
pub async fn discover_movies(
    catalog: &dyn MovieCatalog,
    filters: &DiscoverFilters,
    today: NaiveDate,
) -> AppResult<DiscoverResults> {
    let listing = match filters.trending {
        Some(window) => {
            filters.validate()?;
            catalog.trending(window, filters.page).await?
        }
        None => {
            let genres = catalog.genres().await?;
            let query = filters.to_query(&genres, today)?;
            catalog.discover(&query).await?
        }
    };

    let mut movies = listing.results;
    movies.truncate(DISCOVER_RESULT_LIMIT);

    tracing::info!(
        trending = ?filters.trending,
        page = listing.page,
        results = movies.len(),
        "Discover completed"
    );

    Ok(DiscoverResults {
        page: listing.page,
        total_pages: listing.total_pages,
        movies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{Genre, GenreDictionary, Page, TimeWindow};
    use crate::services::providers::MockMovieCatalog;
    use mockall::predicate::eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn page_of(count: u64) -> Page<MovieSummary> {
        Page {
            page: 1,
            results: (1..=count)
                .map(|id| MovieSummary::from(&crate::models::MovieRecord::new(id, "m", ["Drama"], ["k"])))
                .collect(),
            total_pages: 4,
        }
    }

    #[test]
    fn test_discover_translates_filters() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_genres().returning(|| {
            GenreDictionary::new(vec![Genre {
                id: 18,
                name: "Drama".to_string(),
            }])
        });
        catalog
            .expect_discover()
            .withf(|query| {
                query.with_genres == vec![18]
                    && query.sort_by.as_deref() == Some("popularity.desc")
                    && query.with_cast == vec![5151]
            })
            .returning(|_| Ok(page_of(25)));
        catalog.expect_trending().never();

        let filters = DiscoverFilters {
            genres: Some("Drama".to_string()),
            cast: Some("5151".to_string()),
            popular_only: true,
            ..Default::default()
        };

        let results = tokio_test::block_on(discover_movies(&catalog, &filters, today())).unwrap();

        assert_eq!(results.movies.len(), DISCOVER_RESULT_LIMIT);
        assert_eq!(results.total_pages, 4);
    }

    #[test]
    fn test_trending_bypasses_discover() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_genres().never();
        catalog.expect_discover().never();
        catalog
            .expect_trending()
            .with(eq(TimeWindow::Week), eq(2))
            .returning(|_, _| Ok(page_of(3)));

        let filters = DiscoverFilters {
            trending: Some(TimeWindow::Week),
            page: 2,
            ..Default::default()
        };

        let results = tokio_test::block_on(discover_movies(&catalog, &filters, today())).unwrap();
        assert_eq!(results.movies.len(), 3);
    }

    #[test]
    fn test_invalid_filters_never_reach_catalog() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_genres().returning(|| GenreDictionary::new(vec![]));
        catalog.expect_discover().never();
        catalog.expect_trending().never();

        let filters = DiscoverFilters {
            min_rating: 11.0,
            ..Default::default()
        };
        let result = tokio_test::block_on(discover_movies(&catalog, &filters, today()));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));

        let filters = DiscoverFilters {
            trending: Some(TimeWindow::Day),
            page: 0,
            ..Default::default()
        };
        let result = tokio_test::block_on(discover_movies(&catalog, &filters, today()));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
