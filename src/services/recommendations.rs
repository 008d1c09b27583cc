use std::sync::Arc;

use crate::{
    error::AppError,
    models::{Advisory, CatalogEntry, MovieId, Recommendations, UNKNOWN_TITLE},
    services::{catalog::Catalog, metadata::MetadataClient},
};

/// Related movies returned per source movie
pub const RECOMMENDATION_LIMIT: usize = 5;

/// Resolves a movie to the external service's related movies
///
/// Only the first page of recommendations is requested and nothing is cached.
/// Failures never escape: an empty list comes back with an [`Advisory`]
/// explaining why.
#[derive(Clone)]
pub struct RecommendationResolver {
    catalog: Arc<Catalog>,
    metadata: MetadataClient,
}

impl RecommendationResolver {
    pub fn new(catalog: Arc<Catalog>, metadata: MetadataClient) -> Self {
        Self { catalog, metadata }
    }

    /// Recommendations for a catalog title
    ///
    /// When the catalog holds several movies with this title, the first one is used.
    pub async fn recommend(&self, title: &str) -> Recommendations {
        let Some(entry) = self.catalog.find_by_title(title) else {
            tracing::info!(title = %title, "Title not in catalog, no recommendations");
            return Recommendations::empty(Advisory::title_not_found(title));
        };

        self.recommend_by_id(entry.id).await
    }

    /// Recommendations keyed directly by external id
    pub async fn recommend_by_id(&self, id: MovieId) -> Recommendations {
        let page = match self.metadata.provider().recommendations(id, 1).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(movie_id = id, error = %e, "Recommendation request failed");
                let advisory = match e {
                    AppError::UpstreamStatus(status) => Advisory::service_unavailable(status),
                    other => Advisory::service_unavailable(other),
                };
                return Recommendations::empty(advisory);
            }
        };

        if page.results.is_empty() {
            tracing::info!(movie_id = id, "Service returned no recommendations");
            return Recommendations::empty(Advisory::no_recommendations());
        }

        let entries: Vec<CatalogEntry> = page
            .results
            .into_iter()
            .take(RECOMMENDATION_LIMIT)
            .map(|movie| CatalogEntry {
                title: movie.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
                id: movie.id,
            })
            .collect();

        let movies = self.metadata.enrich(entries, false).await;

        tracing::info!(movie_id = id, results = movies.len(), "Recommendations resolved");

        Recommendations::found(movies)
    }
}
