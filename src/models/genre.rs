use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{AppError, AppResult};

/// A genre as listed by the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Bijective genre name <-> id mapping
///
/// Fetched once and treated as read-only reference data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreDictionary {
    by_name: HashMap<String, u32>,
    by_id: HashMap<u32, String>,
}

impl GenreDictionary {
    /// Builds the dictionary, rejecting duplicate names or ids
    pub fn new(genres: Vec<Genre>) -> AppResult<Self> {
        let mut dictionary = Self::default();

        for genre in genres {
            if dictionary.by_name.contains_key(&genre.name) {
                return Err(AppError::ExternalApi(format!(
                    "Duplicate genre name in catalog: {}",
                    genre.name
                )));
            }
            if dictionary.by_id.contains_key(&genre.id) {
                return Err(AppError::ExternalApi(format!(
                    "Duplicate genre id in catalog: {}",
                    genre.id
                )));
            }
            dictionary.by_name.insert(genre.name.clone(), genre.id);
            dictionary.by_id.insert(genre.id, genre.name);
        }

        Ok(dictionary)
    }

    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Resolves every name, failing on the first unknown one
    pub fn resolve_names<'a, I>(&self, names: I) -> AppResult<Vec<u32>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .map(|name| {
                self.id_of(name)
                    .ok_or_else(|| AppError::InvalidInput(format!("Unknown genre: {}", name)))
            })
            .collect()
    }

    /// Names for the given ids, skipping ids the catalog does not know
    pub fn names_for(&self, ids: &[u32]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.name_of(*id))
            .map(str::to_string)
            .collect()
    }

    /// All genres, sorted by name
    pub fn genres(&self) -> Vec<Genre> {
        let mut genres: Vec<Genre> = self
            .by_id
            .iter()
            .map(|(id, name)| Genre {
                id: *id,
                name: name.clone(),
            })
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        genres
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
