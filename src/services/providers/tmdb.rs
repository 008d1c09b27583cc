/// TMDB (The Movie Database) v3 provider
///
/// Every request carries the API credential as the `api_key` query parameter.
///
/// Endpoints used:
/// 1. Details: /movie/{id}
/// 2. Cast: /movie/{id}/credits
/// 3. Recommendations: /movie/{id}/recommendations
/// 4. Genre browse: /discover/movie
/// 5. Actor search: /search/person, then /person/{id}/movie_credits
use crate::{
    error::{AppError, AppResult},
    models::{
        tmdb::{
            TmdbCredits, TmdbMovieDetails, TmdbMovieSummary, TmdbPage, TmdbPerson,
            TmdbPersonCredits,
        },
        MovieId,
    },
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::instrument;

const PROVIDER_NAME: &str = "tmdb";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            language,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }

    /// Issues a GET and decodes the JSON body
    ///
    /// Non-2xx statuses and undecodable bodies are errors; nothing is retried.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = self.endpoint(path);
        tracing::debug!(path = %path, "TMDB request");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                path = %path,
                status = status.as_u16(),
                provider = PROVIDER_NAME,
                "TMDB returned non-success status"
            );
            return Err(AppError::UpstreamStatus(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(
                path = %path,
                error = %e,
                provider = PROVIDER_NAME,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn movie_details(&self, id: MovieId) -> AppResult<TmdbMovieDetails> {
        self.get_json(
            &format!("/movie/{}", id),
            &[("language", self.language.clone())],
        )
        .await
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn movie_credits(&self, id: MovieId) -> AppResult<TmdbCredits> {
        self.get_json(&format!("/movie/{}/credits", id), &[]).await
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn recommendations(
        &self,
        id: MovieId,
        page: u32,
    ) -> AppResult<TmdbPage<TmdbMovieSummary>> {
        self.get_json(
            &format!("/movie/{}/recommendations", id),
            &[
                ("language", self.language.clone()),
                ("page", page.to_string()),
            ],
        )
        .await
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn discover_by_genre(
        &self,
        genre_id: u32,
        page: u32,
    ) -> AppResult<TmdbPage<TmdbMovieSummary>> {
        self.get_json(
            "/discover/movie",
            &[
                ("with_genres", genre_id.to_string()),
                ("page", page.to_string()),
                ("sort_by", "popularity.desc".to_string()),
            ],
        )
        .await
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn search_person(&self, name: &str) -> AppResult<TmdbPage<TmdbPerson>> {
        self.get_json("/search/person", &[("query", name.to_string())])
            .await
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn person_movie_credits(&self, person_id: u64) -> AppResult<TmdbPersonCredits> {
        self.get_json(&format!("/person/{}/movie_credits", person_id), &[])
            .await
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
