use std::{collections::HashSet, path::Path};

use rand::Rng;

use crate::{
    error::CatalogError,
    models::{CatalogEntry, MovieId},
};

/// The fixed list of known movies, loaded once at startup
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Loads the catalog artifact: a JSON array of objects with `title` and `id`
    ///
    /// A missing, malformed, or empty artifact is fatal for the caller.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path_str.clone(),
            source,
        })?;

        let entries: Vec<CatalogEntry> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path_str.clone(),
                source,
            })?;

        if entries.is_empty() {
            return Err(CatalogError::Empty { path: path_str });
        }

        let catalog = Self::new(entries);

        let duplicates = catalog.duplicate_titles();
        if !duplicates.is_empty() {
            tracing::warn!(
                duplicate_titles = duplicates.len(),
                example = %duplicates[0],
                "Catalog has duplicate titles; title lookups resolve to the first occurrence"
            );
        }

        tracing::info!(path = %path_str, movies = catalog.len(), "Catalog loaded");

        Ok(catalog)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose title matches exactly
    pub fn find_by_title(&self, title: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.title == title)
    }

    pub fn get(&self, id: MovieId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries whose title contains `query`, ignoring case, in catalog order
    pub fn titles_containing(&self, query: &str) -> Vec<&CatalogEntry> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Titles that appear more than once, each reported once
    pub fn duplicate_titles(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();

        for entry in &self.entries {
            let title = entry.title.as_str();
            if !seen.insert(title) && reported.insert(title) {
                duplicates.push(title);
            }
        }

        duplicates
    }

    /// Uniform sample without replacement; asks beyond the catalog size are clamped
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, amount: usize) -> Vec<CatalogEntry> {
        let amount = amount.min(self.entries.len());
        rand::seq::index::sample(rng, self.entries.len(), amount)
            .into_iter()
            .map(|idx| self.entries[idx].clone())
            .collect()
    }
}
