//! Descriptive statistics behind the dashboard and analysis views.
//!
//! The pure helpers (`mean`, `median`, `histogram`, `genre_counts`) work on
//! a few dozen rows at most; the async builders fetch those rows from the
//! catalog first.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::{DiscoverQuery, GenreDictionary, MovieDetails, MovieSummary},
    services::{
        providers::MovieCatalog,
        top_movies::{top_listing, TopListRequest},
    },
};

pub const RATING_HISTOGRAM_MAX_BINS: usize = 10;
pub const HIGH_RATING_THRESHOLD: f64 = 7.5;
pub const FINANCIALS_MAX_ROWS: usize = 20;
pub const FINANCIALS_MIN_RATING: f64 = 6.5;
const POPULARITY_RANKING_LIMIT: usize = 20;
const SIMILAR_MIN_VOTES: u64 = 100;
const VOTE_LEADERS_MIN_VOTES: u64 = 50;
const VOTE_LEADERS_LIMIT: usize = 10;
const OTHER_GENRE: &str = "Other";

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Middle value; the average of the middle pair for even lengths
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// One histogram bucket covering `[start, end)`
///
/// The last bucket also includes its upper bound.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Bucket {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Slack, in bin widths, for values that land on a bin edge up to
/// floating-point error
const EDGE_TOLERANCE: f64 = 1e-9;

/// Index of the bin edge at or just below `value`
fn edge_index(value: f64, width: f64) -> f64 {
    (value / width + EDGE_TOLERANCE).floor()
}

/// Smallest 1-2-5 width whose aligned bins cover `min..=max` in at most
/// `max_bins` buckets; returns `(width, index of the first edge, bin count)`
fn nice_layout(min: f64, max: f64, max_bins: usize) -> (f64, f64, usize) {
    let raw = (max - min) / max_bins as f64;
    let mut magnitude = 10f64.powf(raw.log10().floor());
    loop {
        for step in [1.0, 2.0, 5.0] {
            let width = step * magnitude;
            let first = edge_index(min, width);
            let bins = (max / width - first - EDGE_TOLERANCE).ceil().max(1.0) as usize;
            if bins <= max_bins {
                return (width, first, bins);
            }
        }
        magnitude *= 10.0;
    }
}

/// Buckets `values` into at most `max_bins` equal-width bins
///
/// Bin edges are multiples of a "nice" width (1, 2 or 5 times a power of
/// ten). Non-finite values are ignored.
pub fn histogram(values: &[f64], max_bins: usize) -> Vec<Bucket> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || max_bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![Bucket {
            start: min,
            end: max,
            count: finite.len(),
        }];
    }

    let (width, first, bins) = nice_layout(min, max, max_bins);

    // Edges are whole multiples of the width so they never drift
    let mut buckets: Vec<Bucket> = (0..bins)
        .map(|i| Bucket {
            start: (first + i as f64) * width,
            end: (first + i as f64 + 1.0) * width,
            count: 0,
        })
        .collect();

    for value in finite {
        // max sitting exactly on the last edge stays in the last bucket
        let index = ((edge_index(value, width) - first).max(0.0) as usize).min(bins - 1);
        buckets[index].count += 1;
    }

    buckets
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenreCount {
    pub genre: String,
    pub movies: usize,
}

/// Movies per genre, most common first (ties by name)
pub fn genre_counts(movies: &[MovieSummary], genres: &GenreDictionary) -> Vec<GenreCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for movie in movies {
        for id in &movie.genre_ids {
            let name = genres.name_of(*id).unwrap_or(OTHER_GENRE);
            *counts.entry(name.to_string()).or_default() += 1;
        }
    }

    let mut counts: Vec<GenreCount> = counts
        .into_iter()
        .map(|(genre, movies)| GenreCount { genre, movies })
        .collect();
    counts.sort_by(|a, b| b.movies.cmp(&a.movies).then_with(|| a.genre.cmp(&b.genre)));
    counts
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PopularityEntry {
    pub id: u64,
    pub title: String,
    pub popularity: f64,
}

/// Summary statistics for one listing of movies
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dashboard {
    pub movie_count: usize,
    pub popularity_ranking: Vec<PopularityEntry>,
    pub mean_popularity: Option<f64>,
    pub most_popular: Option<String>,
    pub rating_histogram: Vec<Bucket>,
    pub mean_rating: Option<f64>,
    pub median_rating: Option<f64>,
    pub highly_rated: usize,
    pub genre_counts: Vec<GenreCount>,
    pub dominant_genre: Option<GenreCount>,
}

pub fn dashboard(movies: &[MovieSummary], genres: &GenreDictionary) -> Dashboard {
    let mut ranking: Vec<PopularityEntry> = movies
        .iter()
        .map(|m| PopularityEntry {
            id: m.id,
            title: m.title.clone(),
            popularity: m.popularity,
        })
        .collect();
    ranking.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    ranking.truncate(POPULARITY_RANKING_LIMIT);

    let popularity: Vec<f64> = movies.iter().map(|m| m.popularity).collect();
    let ratings: Vec<f64> = movies.iter().map(|m| m.vote_average).collect();
    let counts = genre_counts(movies, genres);

    Dashboard {
        movie_count: movies.len(),
        mean_popularity: mean(&popularity),
        most_popular: ranking.first().map(|e| e.title.clone()),
        popularity_ranking: ranking,
        rating_histogram: histogram(&ratings, RATING_HISTOGRAM_MAX_BINS),
        mean_rating: mean(&ratings),
        median_rating: median(&ratings),
        highly_rated: ratings.iter().filter(|r| **r > HIGH_RATING_THRESHOLD).count(),
        dominant_genre: counts.first().cloned(),
        genre_counts: counts,
    }
}

/// Dashboard over a top list
pub async fn build_dashboard(
    catalog: &dyn MovieCatalog,
    request: &TopListRequest,
    today: NaiveDate,
) -> AppResult<Dashboard> {
    let (movies, genres) = top_listing(catalog, request, today).await?;
    Ok(dashboard(&movies, &genres))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FinancialRow {
    pub id: u64,
    pub title: String,
    pub budget: u64,
    pub revenue: u64,
    pub roi: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Financials {
    pub rows: Vec<FinancialRow>,
    pub mean_budget: Option<f64>,
    pub mean_revenue: Option<f64>,
    pub profitable: usize,
}

/// Rows for movies with known budget and revenue, capped at `max_rows`
pub fn financials(movies: &[MovieDetails], max_rows: usize) -> Financials {
    let rows: Vec<FinancialRow> = movies
        .iter()
        .filter_map(|m| {
            m.record.roi().map(|roi| FinancialRow {
                id: m.record.id,
                title: m.record.title.clone(),
                budget: m.record.budget,
                revenue: m.record.revenue,
                roi,
            })
        })
        .take(max_rows)
        .collect();

    let budgets: Vec<f64> = rows.iter().map(|r| r.budget as f64).collect();
    let revenues: Vec<f64> = rows.iter().map(|r| r.revenue as f64).collect();

    Financials {
        mean_budget: mean(&budgets),
        mean_revenue: mean(&revenues),
        profitable: rows.iter().filter(|r| r.roi > 0.0).count(),
        rows,
    }
}

/// Financial breakdown for the most popular well-rated movies
///
/// With genre ids, each genre's listing is fetched and concatenated in
/// order; without, the unfiltered listing is used.
pub async fn build_financials(
    catalog: &dyn MovieCatalog,
    genre_ids: &[u32],
) -> AppResult<Financials> {
    let mut queries = Vec::new();
    let base = {
        let mut q = DiscoverQuery::sorted_by("popularity.desc");
        q.vote_average_gte = Some(FINANCIALS_MIN_RATING);
        q
    };
    if genre_ids.is_empty() {
        queries.push(base);
    } else {
        for id in genre_ids {
            let mut q = base.clone();
            q.with_genres = vec![*id];
            queries.push(q);
        }
    }

    let mut listing: Vec<u64> = Vec::new();
    for query in &queries {
        let page = catalog.discover(query).await?;
        listing.extend(page.results.iter().map(|m| m.id));
    }

    let mut rows_source = Vec::new();
    let mut collected = 0;
    for chunk in listing.chunks(FINANCIALS_MAX_ROWS) {
        let details = catalog.fetch_movies_batch(chunk.to_vec()).await?;
        collected += details.iter().filter(|d| d.record.roi().is_some()).count();
        rows_source.extend(details);
        if collected >= FINANCIALS_MAX_ROWS {
            break;
        }
    }

    let result = financials(&rows_source, FINANCIALS_MAX_ROWS);
    tracing::info!(
        listed = listing.len(),
        rows = result.rows.len(),
        profitable = result.profitable,
        "Financial analysis computed"
    );
    Ok(result)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VoteEntry {
    pub id: u64,
    pub title: String,
    pub vote_count: u64,
    pub vote_average: f64,
    pub highlight: bool,
}

/// Where one movie stands among movies of its genres
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieAnalysis {
    pub movie_id: u64,
    pub popularity: f64,
    pub genre_mean_popularity: Option<f64>,
    pub popularity_delta: Option<f64>,
    pub vote_leaders: Vec<VoteEntry>,
    pub budget: u64,
    pub revenue: u64,
    pub roi: Option<f64>,
    pub release_date: Option<NaiveDate>,
}

/// Return on budget; a movie with a budget but no recorded revenue
/// reads as a total loss
fn return_on_budget(budget: u64, revenue: u64) -> Option<f64> {
    (budget > 0).then(|| (revenue as f64 - budget as f64) / budget as f64)
}

/// Top movies by vote count with the analysed movie appended when absent
pub fn vote_leaders(movie: &MovieDetails, leaders: &[MovieSummary], limit: usize) -> Vec<VoteEntry> {
    let mut entries: Vec<VoteEntry> = leaders
        .iter()
        .take(limit)
        .map(|m| VoteEntry {
            id: m.id,
            title: m.title.clone(),
            vote_count: m.vote_count,
            vote_average: m.vote_average,
            highlight: m.id == movie.record.id,
        })
        .collect();

    if !entries.iter().any(|e| e.highlight) {
        entries.push(VoteEntry {
            id: movie.record.id,
            title: movie.record.title.clone(),
            vote_count: movie.record.vote_count,
            vote_average: movie.record.vote_average,
            highlight: true,
        });
    }

    entries
}

pub async fn analyze_movie(catalog: &dyn MovieCatalog, movie_id: u64) -> AppResult<MovieAnalysis> {
    let movie = catalog.fetch_movie(movie_id).await?;
    let genres = catalog.genres().await?;

    let genre_ids: Vec<u32> = movie
        .record
        .genres
        .iter()
        .filter_map(|name| genres.id_of(name))
        .collect();

    let mut similar_query = DiscoverQuery::sorted_by("popularity.desc");
    similar_query.with_genres = genre_ids.clone();
    similar_query.vote_count_gte = Some(SIMILAR_MIN_VOTES);
    let similar = catalog.discover(&similar_query).await?;

    let popularity: Vec<f64> = similar.results.iter().map(|m| m.popularity).collect();
    let genre_mean_popularity = mean(&popularity);

    let mut leaders_query = DiscoverQuery::sorted_by("vote_count.desc");
    leaders_query.with_genres = genre_ids;
    leaders_query.vote_count_gte = Some(VOTE_LEADERS_MIN_VOTES);
    let leaders = catalog.discover(&leaders_query).await?;

    tracing::info!(
        movie_id,
        similar = similar.results.len(),
        leaders = leaders.results.len(),
        "Movie analysis computed"
    );

    Ok(MovieAnalysis {
        movie_id,
        popularity: movie.record.popularity,
        genre_mean_popularity,
        popularity_delta: genre_mean_popularity.map(|avg| movie.record.popularity - avg),
        vote_leaders: vote_leaders(&movie, &leaders.results, VOTE_LEADERS_LIMIT),
        budget: movie.record.budget,
        revenue: movie.record.revenue,
        roi: return_on_budget(movie.record.budget, movie.record.revenue),
        release_date: movie.record.release_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{Genre, MovieRecord, Page};
    use crate::services::providers::MockMovieCatalog;

    fn summary(id: u64, title: &str, popularity: f64, rating: f64, genre_ids: &[u32]) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            release_date: None,
            genre_ids: genre_ids.to_vec(),
            popularity,
            vote_average: rating,
            vote_count: id * 100,
            overview: None,
            poster_path: None,
        }
    }

    fn details(id: u64, budget: u64, revenue: u64) -> MovieDetails {
        let mut record = MovieRecord::new(id, &format!("Movie {}", id), ["Drama"], ["family"]);
        record.budget = budget;
        record.revenue = revenue;
        record.popularity = 50.0;
        MovieDetails {
            record,
            original_title: None,
            tagline: None,
            runtime: None,
            spoken_languages: vec![],
            cast: vec![],
            crew: vec![],
        }
    }

    fn dictionary() -> GenreDictionary {
        GenreDictionary::new(vec![
            Genre {
                id: 18,
                name: "Drama".to_string(),
            },
            Genre {
                id: 35,
                name: "Comedy".to_string(),
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_mean_and_median() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(median(&[6.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_histogram_ratings_use_unit_bins() {
        let ratings = [6.1, 6.4, 7.0, 7.9, 8.5, 8.6, 2.0];
        let buckets = histogram(&ratings, 10);

        assert!(buckets.len() <= 10);
        assert_eq!(buckets[0].start, 2.0);
        assert_eq!(buckets[0].end - buckets[0].start, 1.0);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), ratings.len());

        let six = buckets.iter().find(|b| b.start == 6.0).unwrap();
        assert_eq!(six.count, 2);
        let eight = buckets.iter().find(|b| b.start == 8.0).unwrap();
        assert_eq!(eight.count, 2);
    }

    #[test]
    fn test_histogram_max_lands_in_last_bucket() {
        let buckets = histogram(&[0.0, 5.0, 10.0], 10);
        assert_eq!(buckets.len(), 10);
        assert_eq!(buckets.last().unwrap().end, 10.0);
        assert_eq!(buckets.last().unwrap().count, 1);
        assert_eq!(buckets[5].count, 1);
        assert_eq!(buckets[0].count, 1);
    }

    #[test]
    fn test_histogram_interior_edges_count_upwards() {
        let buckets = histogram(&[7.0, 7.6, 8.8], 10);

        assert_eq!(buckets.len(), 9);
        let edge = |at: f64| buckets.iter().position(|b| (b.start - at).abs() < 1e-9).unwrap();
        assert_eq!(buckets[edge(7.0)].count, 1);
        assert_eq!(buckets[edge(7.6)].count, 1);
        assert_eq!(buckets[edge(7.4)].count, 0);
        assert_eq!(buckets.last().unwrap().count, 1);
        assert!((buckets.last().unwrap().end - 8.8).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_tenths_land_in_their_own_bins() {
        let ratings: Vec<f64> = (60..=70).map(|r| r as f64 / 10.0).collect();
        let buckets = histogram(&ratings, 10);

        assert_eq!(buckets.len(), 10);
        assert!(buckets[..9].iter().all(|b| b.count == 1));
        assert_eq!(buckets[9].count, 2);
    }

    #[test]
    fn test_histogram_respects_max_bins_for_wide_spans() {
        let values: Vec<f64> = (0..100).map(|v| v as f64 * 13.0).collect();
        let buckets = histogram(&values, 10);
        assert!(buckets.len() <= 10);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 100);
    }

    #[test]
    fn test_histogram_degenerate_inputs() {
        assert!(histogram(&[], 10).is_empty());
        assert!(histogram(&[f64::NAN], 10).is_empty());
        assert_eq!(
            histogram(&[7.0, 7.0], 10),
            vec![Bucket {
                start: 7.0,
                end: 7.0,
                count: 2
            }]
        );
    }

    #[test]
    fn test_genre_counts_sorted_with_other_bucket() {
        let movies = vec![
            summary(1, "A", 1.0, 7.0, &[18, 35]),
            summary(2, "B", 1.0, 7.0, &[18]),
            summary(3, "C", 1.0, 7.0, &[999]),
        ];
        let counts = genre_counts(&movies, &dictionary());
        assert_eq!(
            counts,
            vec![
                GenreCount {
                    genre: "Drama".to_string(),
                    movies: 2
                },
                GenreCount {
                    genre: "Comedy".to_string(),
                    movies: 1
                },
                GenreCount {
                    genre: "Other".to_string(),
                    movies: 1
                },
            ]
        );
    }

    #[test]
    fn test_dashboard_summarises_listing() {
        let movies = vec![
            summary(1, "Quiet", 10.0, 8.0, &[18]),
            summary(2, "Loud", 90.0, 6.0, &[35]),
            summary(3, "Middle", 50.0, 7.6, &[18]),
        ];
        let dash = dashboard(&movies, &dictionary());

        assert_eq!(dash.movie_count, 3);
        assert_eq!(dash.most_popular.as_deref(), Some("Loud"));
        assert_eq!(dash.popularity_ranking[2].title, "Quiet");
        assert_eq!(dash.mean_popularity, Some(50.0));
        assert_eq!(dash.median_rating, Some(7.6));
        assert_eq!(dash.highly_rated, 2);
        assert_eq!(dash.dominant_genre.unwrap().genre, "Drama");
    }

    #[test]
    fn test_dashboard_empty_listing() {
        let dash = dashboard(&[], &dictionary());
        assert_eq!(dash.movie_count, 0);
        assert!(dash.rating_histogram.is_empty());
        assert_eq!(dash.mean_rating, None);
        assert_eq!(dash.most_popular, None);
        assert_eq!(dash.dominant_genre, None);
    }

    #[test]
    fn test_financials_skip_unknown_and_cap_rows() {
        let mut movies = vec![details(1, 0, 100), details(2, 100, 0)];
        movies.extend((3..30).map(|id| details(id, 100, if id % 2 == 0 { 50 } else { 300 })));

        let result = financials(&movies, FINANCIALS_MAX_ROWS);

        assert_eq!(result.rows.len(), FINANCIALS_MAX_ROWS);
        assert_eq!(result.rows[0].id, 3);
        assert_eq!(result.rows[0].roi, 2.0);
        assert_eq!(result.profitable, 10);
        assert_eq!(result.mean_budget, Some(100.0));
    }

    #[test]
    fn test_vote_leaders_appends_missing_movie() {
        let movie = details(77, 10, 20);
        let leaders = vec![summary(1, "A", 1.0, 8.0, &[]), summary(2, "B", 1.0, 8.0, &[])];

        let entries = vote_leaders(&movie, &leaders, 10);
        assert_eq!(entries.len(), 3);
        assert!(entries[2].highlight);
        assert_eq!(entries[2].id, 77);

        let leaders = vec![summary(77, "Movie 77", 1.0, 8.0, &[]), summary(2, "B", 1.0, 8.0, &[])];
        let entries = vote_leaders(&movie, &leaders, 10);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].highlight);
        assert!(!entries[1].highlight);
    }

    #[tokio::test]
    async fn test_analyze_movie_compares_against_genre() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_fetch_movie().returning(|id| Ok(details(id, 100, 150)));
        catalog.expect_genres().returning(|| Ok(dictionary()));
        catalog.expect_discover().returning(|query| {
            let results = if query.sort_by.as_deref() == Some("vote_count.desc") {
                vec![summary(1, "Leader", 1.0, 8.0, &[18])]
            } else {
                vec![
                    summary(2, "Similar", 30.0, 7.0, &[18]),
                    summary(3, "Similar 2", 10.0, 7.0, &[18]),
                ]
            };
            assert_eq!(query.with_genres, vec![18]);
            Ok(Page {
                page: 1,
                results,
                total_pages: 1,
            })
        });

        let analysis = analyze_movie(&catalog, 5).await.unwrap();

        assert_eq!(analysis.genre_mean_popularity, Some(20.0));
        assert_eq!(analysis.popularity_delta, Some(30.0));
        assert_eq!(analysis.roi, Some(0.5));
        assert_eq!(analysis.vote_leaders.len(), 2);
        assert!(analysis.vote_leaders[1].highlight);
    }

    #[test]
    fn test_movie_roi_only_needs_a_budget() {
        assert_eq!(return_on_budget(100, 0), Some(-1.0));
        assert_eq!(return_on_budget(100, 250), Some(1.5));
        assert_eq!(return_on_budget(0, 250), None);
    }

    #[tokio::test]
    async fn test_analyze_movie_without_revenue_is_total_loss() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_fetch_movie().returning(|id| Ok(details(id, 100, 0)));
        catalog.expect_genres().returning(|| Ok(dictionary()));
        catalog.expect_discover().returning(|_| {
            Ok(Page {
                page: 1,
                results: vec![],
                total_pages: 0,
            })
        });

        let analysis = analyze_movie(&catalog, 8).await.unwrap();

        assert_eq!(analysis.roi, Some(-1.0));
        assert_eq!(analysis.genre_mean_popularity, None);
        assert_eq!(analysis.popularity_delta, None);
        assert_eq!(analysis.vote_leaders.len(), 1);
    }

    #[tokio::test]
    async fn test_build_financials_queries_each_genre() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_discover().times(2).returning(|query| {
            assert_eq!(query.vote_average_gte, Some(FINANCIALS_MIN_RATING));
            let genre = query.with_genres[0] as u64;
            Ok(Page {
                page: 1,
                results: vec![summary(genre, "G", 1.0, 7.0, &[])],
                total_pages: 1,
            })
        });
        catalog
            .expect_fetch_movies_batch()
            .withf(|ids| ids == &vec![18, 35])
            .returning(|ids| Ok(ids.into_iter().map(|id| details(id, 100, 200)).collect()));

        let result = build_financials(&catalog, &[18, 35]).await.unwrap();

        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.profitable, 2);
    }

    #[tokio::test]
    async fn test_build_financials_surfaces_catalog_errors() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_discover()
            .returning(|_| Err(AppError::ExternalApi("down".to_string())));

        let result = build_financials(&catalog, &[]).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
