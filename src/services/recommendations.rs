//! Content-based movie recommendations.
//!
//! [`score_and_rank`] is the shared scorer: it ranks already-fetched
//! candidates against a reference movie by genre and keyword overlap.
//! [`recommend`] fetches those inputs from a [`MovieCatalog`] first.

use std::collections::BTreeSet;

use crate::{
    error::{AppError, AppResult},
    models::{MovieDetails, MovieRecord, ScoredCandidate},
    services::providers::MovieCatalog,
};

/// Genres that must carry over from the reference to every recommendation.
///
/// Covers both the descriptive labels and TMDB's canonical names
/// ("History", "Music").
pub const STRICT_GENRES: &[&str] = &[
    "Animation",
    "Documentary",
    "Fantasy",
    "Historical",
    "History",
    "Horror",
    "Music",
    "Musical",
    "Science Fiction",
    "War",
    "Western",
];

const GENRE_WEIGHT: u32 = 2;
const GENRE_BONUS_THRESHOLD: usize = 2;
const GENRE_BONUS: u32 = 3;
const KEYWORD_WEIGHT: u32 = 1;
const KEYWORD_BONUS_THRESHOLD: usize = 3;
const KEYWORD_BONUS: u32 = 4;

pub const DEFAULT_TOP_N: usize = 51;
pub const DEFAULT_CANDIDATE_COUNT: usize = 51;
pub const MAX_TOP_N: usize = 100;
pub const MAX_CANDIDATE_COUNT: usize = 100;

/// Strict genres present in `genres`
pub fn mandatory_genres(genres: &BTreeSet<String>) -> BTreeSet<String> {
    genres
        .iter()
        .filter(|g| STRICT_GENRES.contains(&g.as_str()))
        .cloned()
        .collect()
}

/// Overlap score for the given shared genre and keyword counts
pub fn overlap_score(shared_genres: usize, shared_keywords: usize) -> u32 {
    let mut score = GENRE_WEIGHT * shared_genres as u32;
    if shared_genres >= GENRE_BONUS_THRESHOLD {
        score += GENRE_BONUS;
    }
    score += KEYWORD_WEIGHT * shared_keywords as u32;
    if shared_keywords >= KEYWORD_BONUS_THRESHOLD {
        score += KEYWORD_BONUS;
    }
    score
}

/// Ranks `candidates` by similarity to `reference`, best first.
///
/// Candidates missing any strict genre of the reference are dropped, as is
/// the reference itself. Equal scores keep their input order. At most
/// `top_n` entries are returned.
///
/// Expects fully hydrated records (genres and keywords filled in); the
/// fetch layer is responsible for that.
pub fn score_and_rank(
    reference: &MovieRecord,
    candidates: &[MovieRecord],
    top_n: usize,
) -> Vec<ScoredCandidate> {
    if top_n == 0 {
        return Vec::new();
    }

    let mandatory = mandatory_genres(&reference.genres);

    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .filter(|m| m.id != reference.id)
        .filter(|m| mandatory.is_subset(&m.genres))
        .map(|m| {
            let shared_genres: BTreeSet<String> =
                reference.genres.intersection(&m.genres).cloned().collect();
            let shared_keywords: BTreeSet<String> =
                reference.keywords.intersection(&m.keywords).cloned().collect();

            ScoredCandidate {
                score: overlap_score(shared_genres.len(), shared_keywords.len()),
                movie: m.clone(),
                shared_genres,
                shared_keywords,
            }
        })
        .collect();

    // sort_by is stable: ties keep the catalog's popularity order
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(top_n);
    scored
}

/// Recommendations for one movie
#[derive(Debug, Clone, serde::Serialize)]
pub struct Recommendations {
    pub reference: MovieDetails,
    pub mandatory_genres: BTreeSet<String>,
    pub candidates_considered: usize,
    pub recommendations: Vec<ScoredCandidate>,
}

/// Fetches the reference movie and a candidate pool, then ranks the pool.
///
/// Candidates share the reference's genres and, when known, its primary
/// spoken language.
pub async fn recommend(
    catalog: &dyn MovieCatalog,
    movie_id: u64,
    top_n: usize,
    candidate_count: usize,
) -> AppResult<Recommendations> {
    if top_n > MAX_TOP_N {
        return Err(AppError::InvalidInput(format!(
            "top_n must be at most {}",
            MAX_TOP_N
        )));
    }
    if candidate_count == 0 || candidate_count > MAX_CANDIDATE_COUNT {
        return Err(AppError::InvalidInput(format!(
            "candidates must be between 1 and {}",
            MAX_CANDIDATE_COUNT
        )));
    }

    let reference = catalog.fetch_movie(movie_id).await?;
    let genres = catalog.genres().await?;

    let genre_ids: Vec<u32> = reference
        .record
        .genres
        .iter()
        .filter_map(|name| genres.id_of(name))
        .collect();

    let mandatory = mandatory_genres(&reference.record.genres);

    if genre_ids.is_empty() {
        tracing::info!(
            movie_id,
            "Reference movie has no catalog genres, nothing to recommend"
        );
        return Ok(Recommendations {
            reference,
            mandatory_genres: mandatory,
            candidates_considered: 0,
            recommendations: Vec::new(),
        });
    }

    let language = reference.primary_language().map(str::to_string);
    let candidates = catalog
        .fetch_candidates(genre_ids, language, candidate_count)
        .await?;

    let recommendations = score_and_rank(&reference.record, &candidates, top_n);

    tracing::info!(
        movie_id,
        candidates = candidates.len(),
        recommended = recommendations.len(),
        mandatory = ?mandatory,
        "Recommendations computed"
    );

    Ok(Recommendations {
        reference,
        mandatory_genres: mandatory,
        candidates_considered: candidates.len(),
        recommendations,
    })
}
