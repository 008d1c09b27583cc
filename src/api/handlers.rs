use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Genre, MovieCard, MovieId, PersonCredit, Recommendations},
    services::session::{BrowseMode, BrowseRequest, Session},
};

use super::{
    extract::{ApiJson, ApiPath, ApiQuery},
    AppState,
};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    pub size: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub title: String,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct GenreParams {
    #[serde(default = "first_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct ActorParams {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct GenreSummary {
    pub name: &'static str,
    pub id: u32,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub movie_id: MovieId,
}

// Handlers

pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

pub async fn search_movies(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> AppResult<Json<Vec<MovieCard>>> {
    let workflow = &state.workflow;
    workflow.config().ensure_allowed(BrowseMode::Search)?;

    let movies = workflow
        .query()
        .search(&params.q, workflow.config().search_limit)
        .await;
    Ok(Json(movies))
}

pub async fn discovery_feed(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<FeedParams>,
) -> AppResult<Json<Vec<MovieCard>>> {
    state.workflow.config().ensure_allowed(BrowseMode::Feed)?;
    Ok(Json(state.workflow.feed(params.size).await?))
}

/// Details and cast for a catalog movie
pub async fn movie_details(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<MovieId>,
) -> AppResult<Json<MovieCard>> {
    let workflow = &state.workflow;
    let entry = workflow
        .catalog()
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not in catalog", id)))?;

    let card = workflow
        .metadata()
        .card(entry.id, entry.title.clone(), true)
        .await;
    Ok(Json(card))
}

pub async fn recommendations(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RecommendationParams>,
) -> Json<Recommendations> {
    Json(state.workflow.resolver().recommend(&params.title).await)
}

pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<GenreSummary>>> {
    state.workflow.config().ensure_allowed(BrowseMode::Genre)?;

    let genres = Genre::ALL
        .into_iter()
        .map(|g| GenreSummary {
            name: g.name(),
            id: g.id(),
        })
        .collect();
    Ok(Json(genres))
}

pub async fn browse_genre(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    ApiQuery(params): ApiQuery<GenreParams>,
) -> AppResult<Json<Vec<MovieCard>>> {
    state.workflow.config().ensure_allowed(BrowseMode::Genre)?;
    let genre: Genre = name.parse().map_err(AppError::InvalidInput)?;

    Ok(Json(
        state.workflow.query().browse_genre(genre, params.page).await,
    ))
}

pub async fn search_actor(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ActorParams>,
) -> AppResult<Json<Vec<PersonCredit>>> {
    state.workflow.config().ensure_allowed(BrowseMode::Actor)?;
    Ok(Json(state.workflow.query().search_actor(&params.name).await))
}

pub async fn create_session(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> (StatusCode, Json<Session>) {
    let session = state.workflow.create_session().await;
    tracing::info!(request_id = %request_id, session_id = %session.id, "Session started");
    (StatusCode::CREATED, Json(session))
}

pub async fn get_session(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Session>> {
    Ok(Json(state.workflow.session(id).await?))
}

pub async fn delete_session(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    state.workflow.end_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn browse_session(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<BrowseRequest>,
) -> AppResult<Json<Session>> {
    tracing::info!(
        request_id = %request_id,
        session_id = %id,
        mode = %request.mode(),
        "Processing browse request"
    );

    Ok(Json(state.workflow.browse(id, request).await?))
}

pub async fn select_movie(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<SelectRequest>,
) -> AppResult<Json<Session>> {
    tracing::info!(
        request_id = %request_id,
        session_id = %id,
        movie_id = request.movie_id,
        "Processing select request"
    );

    Ok(Json(state.workflow.select(id, request.movie_id).await?))
}

pub async fn go_back(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Session>> {
    Ok(Json(state.workflow.back(id).await?))
}
