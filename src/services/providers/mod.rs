/// Movie metadata provider abstraction
///
/// A provider performs the raw reads against an external metadata service and
/// reports every failure as an error. Degrading those failures into placeholder
/// records is the job of [`crate::services::metadata::MetadataClient`].
use crate::{
    error::AppResult,
    models::{
        tmdb::{TmdbCredits, TmdbMovieDetails, TmdbMovieSummary, TmdbPage, TmdbPerson, TmdbPersonCredits},
        MovieId,
    },
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
///
/// All operations are read-only and idempotent. Implementations must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch poster, overview, rating, release date and genres for a movie
    async fn movie_details(&self, id: MovieId) -> AppResult<TmdbMovieDetails>;

    /// Fetch the billed cast for a movie
    async fn movie_credits(&self, id: MovieId) -> AppResult<TmdbCredits>;

    /// Fetch one page of the service's recommendations for a movie
    async fn recommendations(&self, id: MovieId, page: u32)
        -> AppResult<TmdbPage<TmdbMovieSummary>>;

    /// Fetch one page of a genre's movies, most popular first
    async fn discover_by_genre(
        &self,
        genre_id: u32,
        page: u32,
    ) -> AppResult<TmdbPage<TmdbMovieSummary>>;

    /// Search people by free-text name
    async fn search_person(&self, name: &str) -> AppResult<TmdbPage<TmdbPerson>>;

    /// Fetch the movies a person is credited in
    async fn person_movie_credits(&self, person_id: u64) -> AppResult<TmdbPersonCredits>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
