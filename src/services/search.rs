use serde::Serialize;

use crate::{
    error::AppResult,
    models::{KeywordRef, MovieSummary, Person, PersonRole},
    services::providers::MovieCatalog,
};

/// A search hit ready for a picker: id plus a `"Title (YYYY)"` label
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TitleMatch {
    pub id: u64,
    pub label: String,
    pub popularity: f64,
    pub poster_path: Option<String>,
}

impl From<&MovieSummary> for TitleMatch {
    fn from(movie: &MovieSummary) -> Self {
        Self {
            id: movie.id,
            label: movie.label(),
            popularity: movie.popularity,
            poster_path: movie.poster_path.clone(),
        }
    }
}

/// Title search, most popular first
pub async fn search_titles(catalog: &dyn MovieCatalog, query: &str) -> AppResult<Vec<TitleMatch>> {
    let movies = catalog.search_movies(query).await?;
    Ok(movies.iter().map(TitleMatch::from).collect())
}

pub async fn search_people(
    catalog: &dyn MovieCatalog,
    query: &str,
    role: PersonRole,
) -> AppResult<Vec<Person>> {
    catalog.search_people(query, role).await
}

pub async fn search_keywords(catalog: &dyn MovieCatalog, query: &str) -> AppResult<Vec<KeywordRef>> {
    catalog.search_keywords(query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::providers::MockMovieCatalog;
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    #[test]
    fn test_search_titles_labels_with_year() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search_movies()
            .with(eq("shrek"))
            .returning(|_| {
                Ok(vec![
                    MovieSummary {
                        id: 808,
                        title: "Shrek".to_string(),
                        release_date: NaiveDate::from_ymd_opt(2001, 5, 18),
                        genre_ids: vec![16, 35],
                        popularity: 80.0,
                        vote_average: 7.7,
                        vote_count: 16000,
                        overview: None,
                        poster_path: Some("/shrek.jpg".to_string()),
                    },
                    MovieSummary {
                        id: 9999,
                        title: "Shrek Untitled".to_string(),
                        release_date: None,
                        genre_ids: vec![],
                        popularity: 1.0,
                        vote_average: 0.0,
                        vote_count: 0,
                        overview: None,
                        poster_path: None,
                    },
                ])
            });

        let hits = tokio_test::block_on(search_titles(&catalog, "shrek")).unwrap();

        assert_eq!(hits[0].label, "Shrek (2001)");
        assert_eq!(hits[0].id, 808);
        assert_eq!(hits[1].label, "Shrek Untitled");
    }

    #[test]
    fn test_search_errors_propagate() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search_keywords()
            .returning(|_| Err(AppError::InvalidInput("Search query cannot be empty".to_string())));

        let result = tokio_test::block_on(search_keywords(&catalog, " "));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_search_people_passes_role() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search_people()
            .withf(|query, role| query == "craven" && *role == PersonRole::Crew)
            .returning(|_, _| {
                Ok(vec![Person {
                    id: 5140,
                    name: "Wes Craven".to_string(),
                    known_for_department: Some("Directing".to_string()),
                    popularity: 12.0,
                }])
            });

        let people = tokio_test::block_on(search_people(&catalog, "craven", PersonRole::Crew)).unwrap();
        assert_eq!(people[0].name, "Wes Craven");
    }
}
