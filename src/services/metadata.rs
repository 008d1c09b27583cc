use std::{cmp::Ordering, sync::Arc};

use futures::{stream, StreamExt};

use crate::{
    models::{
        CatalogEntry, Cast, CastMember, MovieCard, MovieDetails, MovieId, PersonCredit,
        UNKNOWN_TITLE,
    },
    services::providers::MetadataProvider,
};

/// Cast members kept per movie
pub const CAST_LIMIT: usize = 5;
/// Movies kept from one page of genre discovery
pub const GENRE_LIMIT: usize = 15;
/// Movies kept from an actor's filmography
pub const PERSON_CREDIT_LIMIT: usize = 15;

/// Metadata lookups that never fail
///
/// Wraps a [`MetadataProvider`] and substitutes the documented fallback for any
/// error: the placeholder record for details, the sentinel for cast, and an empty
/// list for genre and actor browsing. A failed call is not retried.
#[derive(Clone)]
pub struct MetadataClient {
    provider: Arc<dyn MetadataProvider>,
    image_base: String,
    concurrency: usize,
}

impl MetadataClient {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        image_base: impl Into<String>,
        concurrency: usize,
    ) -> Self {
        Self {
            provider,
            image_base: image_base.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// The underlying provider, for callers that need to see raw failures
    pub fn provider(&self) -> &Arc<dyn MetadataProvider> {
        &self.provider
    }

    pub async fn details(&self, id: MovieId) -> MovieDetails {
        match self.provider.movie_details(id).await {
            Ok(raw) => raw.into_details(&self.image_base),
            Err(e) => {
                tracing::warn!(
                    movie_id = id,
                    error = %e,
                    provider = self.provider.name(),
                    "Details lookup failed, using placeholder"
                );
                MovieDetails::placeholder()
            }
        }
    }

    pub async fn cast(&self, id: MovieId) -> Cast {
        match self.provider.movie_credits(id).await {
            Ok(credits) => Cast::Members(
                credits
                    .cast
                    .into_iter()
                    .take(CAST_LIMIT)
                    .map(CastMember::from)
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!(
                    movie_id = id,
                    error = %e,
                    provider = self.provider.name(),
                    "Cast lookup failed"
                );
                Cast::Unavailable
            }
        }
    }

    /// Builds a card for one movie, optionally with its cast
    pub async fn card(&self, id: MovieId, title: String, with_cast: bool) -> MovieCard {
        let details = self.details(id).await;
        let cast = if with_cast {
            Some(self.cast(id).await)
        } else {
            None
        };

        MovieCard {
            id,
            title,
            details,
            cast,
        }
    }

    /// Enriches a batch of entries, keeping input order
    ///
    /// At most `concurrency` entries are being fetched at any moment.
    pub async fn enrich(&self, entries: Vec<CatalogEntry>, with_cast: bool) -> Vec<MovieCard> {
        stream::iter(entries)
            .map(|entry| self.card(entry.id, entry.title, with_cast))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// The most popular movies of a genre, titled as the service titles them
    pub async fn movies_by_genre(&self, genre_id: u32, page: u32) -> Vec<MovieCard> {
        let results = match self.provider.discover_by_genre(genre_id, page).await {
            Ok(page) => page.results,
            Err(e) => {
                tracing::warn!(
                    genre_id = genre_id,
                    page = page,
                    error = %e,
                    provider = self.provider.name(),
                    "Genre discovery failed"
                );
                return Vec::new();
            }
        };

        let entries = results
            .into_iter()
            .take(GENRE_LIMIT)
            .map(|movie| CatalogEntry {
                title: movie.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
                id: movie.id,
            })
            .collect();

        let movies = self.enrich(entries, false).await;
        tracing::info!(genre_id = genre_id, page = page, results = movies.len(), "Genre browse completed");
        movies
    }

    /// Movies featuring the best-matching person for `name`
    ///
    /// Only the first search hit is considered. Credits are ordered by descending
    /// popularity and truncated before entries without a title or id are dropped.
    pub async fn movies_by_person(&self, name: &str) -> Vec<PersonCredit> {
        let name = name.trim();
        if name.is_empty() {
            return Vec::new();
        }

        let person = match self.provider.search_person(name).await {
            Ok(page) => match page.results.into_iter().next() {
                Some(person) => person,
                None => {
                    tracing::info!(name = %name, "No person matched search");
                    return Vec::new();
                }
            },
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Person search failed");
                return Vec::new();
            }
        };

        let mut credits = match self.provider.person_movie_credits(person.id).await {
            Ok(credits) => credits.cast,
            Err(e) => {
                tracing::warn!(
                    person_id = person.id,
                    error = %e,
                    "Person credits lookup failed"
                );
                return Vec::new();
            }
        };

        credits.sort_by(|a, b| {
            b.popularity
                .unwrap_or(0.0)
                .partial_cmp(&a.popularity.unwrap_or(0.0))
                .unwrap_or(Ordering::Equal)
        });
        credits.truncate(PERSON_CREDIT_LIMIT);

        let films: Vec<(MovieId, String)> = credits
            .into_iter()
            .filter_map(|credit| match (credit.id, credit.title) {
                (Some(id), Some(title)) if !title.is_empty() => Some((id, title)),
                _ => None,
            })
            .collect();

        let credits: Vec<PersonCredit> = stream::iter(films)
            .map(|(id, title)| async move {
                PersonCredit {
                    id,
                    poster_url: self.details(id).await.poster_url,
                    title,
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        tracing::info!(
            name = %name,
            person_id = person.id,
            results = credits.len(),
            "Actor search completed"
        );

        credits
    }
}
