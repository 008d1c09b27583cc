use std::sync::Arc;

use rand::Rng;

use crate::{
    models::{CatalogEntry, Genre, MovieCard, PersonCredit},
    services::{catalog::Catalog, metadata::MetadataClient},
};

/// Catalog search, discovery feed, genre and actor browsing
#[derive(Clone)]
pub struct QueryEngine {
    catalog: Arc<Catalog>,
    metadata: MetadataClient,
}

impl QueryEngine {
    pub fn new(catalog: Arc<Catalog>, metadata: MetadataClient) -> Self {
        Self { catalog, metadata }
    }

    /// Case-insensitive substring search over catalog titles
    ///
    /// Matches come back in catalog order; `limit` caps how many are enriched.
    pub async fn search(&self, query: &str, limit: Option<usize>) -> Vec<MovieCard> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let matches: Vec<CatalogEntry> = self
            .catalog
            .titles_containing(query)
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        let movies = self.metadata.enrich(matches, false).await;
        tracing::info!(query = %query, results = movies.len(), "Catalog search completed");
        movies
    }

    /// A fresh random sample of the catalog
    pub async fn discovery_feed(&self, size: usize, with_cast: bool) -> Vec<MovieCard> {
        let entries = {
            let mut rng = rand::rng();
            self.catalog.sample(&mut rng, size)
        };
        self.enrich_feed(entries, with_cast).await
    }

    /// Same as [`QueryEngine::discovery_feed`] but sampled from the caller's RNG
    pub async fn discovery_feed_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        size: usize,
        with_cast: bool,
    ) -> Vec<MovieCard> {
        let entries = self.catalog.sample(rng, size);
        self.enrich_feed(entries, with_cast).await
    }

    async fn enrich_feed(&self, entries: Vec<CatalogEntry>, with_cast: bool) -> Vec<MovieCard> {
        let movies = self.metadata.enrich(entries, with_cast).await;
        tracing::info!(results = movies.len(), with_cast = with_cast, "Discovery feed sampled");
        movies
    }

    pub async fn browse_genre(&self, genre: Genre, page: u32) -> Vec<MovieCard> {
        self.metadata.movies_by_genre(genre.id(), page.max(1)).await
    }

    pub async fn search_actor(&self, name: &str) -> Vec<PersonCredit> {
        self.metadata.movies_by_person(name).await
    }
}
