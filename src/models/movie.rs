use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// A fully hydrated movie: the unit the recommender scores
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    pub id: u64,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub genres: BTreeSet<String>,
    pub keywords: BTreeSet<String>,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: u64,
    /// 0 means unknown
    pub budget: u64,
    /// 0 means unknown
    pub revenue: u64,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub original_language: Option<String>,
}

impl MovieRecord {
    /// Creates a record with only identity, genres and keywords set
    pub fn new<G, K>(id: u64, title: &str, genres: G, keywords: K) -> Self
    where
        G: IntoIterator,
        G::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            id,
            title: title.to_string(),
            release_date: None,
            genres: genres.into_iter().map(Into::into).collect(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            popularity: 0.0,
            vote_average: 0.0,
            vote_count: 0,
            budget: 0,
            revenue: 0,
            overview: None,
            poster_path: None,
            original_language: None,
        }
    }

    /// Return on investment, when both budget and revenue are known
    pub fn roi(&self) -> Option<f64> {
        if self.budget == 0 || self.revenue == 0 {
            return None;
        }
        Some((self.revenue as f64 - self.budget as f64) / self.budget as f64)
    }
}

/// List-shaped movie as returned by search, discover and trending endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_release_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl MovieSummary {
    /// Display label used by search boxes, e.g. "Shrek (2001)"
    pub fn label(&self) -> String {
        match self.release_date {
            Some(date) => format!("{} ({})", self.title, date.format("%Y")),
            None => self.title.clone(),
        }
    }
}

impl From<&MovieRecord> for MovieSummary {
    fn from(record: &MovieRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            release_date: record.release_date,
            genre_ids: Vec::new(),
            popularity: record.popularity,
            vote_average: record.vote_average,
            vote_count: record.vote_count,
            overview: record.overview.clone(),
            poster_path: record.poster_path.clone(),
        }
    }
}

/// Spoken language of a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpokenLanguage {
    pub iso_639_1: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

/// Everything the movie detail view shows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub record: MovieRecord,
    pub original_title: Option<String>,
    pub tagline: Option<String>,
    /// Minutes
    pub runtime: Option<u32>,
    pub spoken_languages: Vec<SpokenLanguage>,
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

impl MovieDetails {
    /// ISO 639-1 code of the first spoken language
    pub fn primary_language(&self) -> Option<&str> {
        self.spoken_languages
            .first()
            .map(|l| l.iso_639_1.as_str())
            .filter(|code| !code.is_empty())
    }
}

/// A person found through people search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

/// A catalog keyword (tag)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordRef {
    pub id: u64,
    pub name: String,
}

/// Result of scoring one candidate against a reference movie
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredCandidate {
    pub score: u32,
    pub movie: MovieRecord,
    pub shared_genres: BTreeSet<String>,
    pub shared_keywords: BTreeSet<String>,
}

/// TMDB sends `""` for unknown release dates
pub(crate) fn deserialize_release_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}
