use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Genre, MovieCard, MovieId},
    services::{
        catalog::Catalog,
        metadata::MetadataClient,
        query::QueryEngine,
        recommendations::RecommendationResolver,
        session::{
            BrowseContext, BrowseMode, BrowseRequest, Selectable, Session, SessionStore,
            WorkflowConfig,
        },
    },
};

/// Drives sessions through browse, select and back
///
/// Network work happens before the session store is locked; the lock is only
/// held to apply the finished transition.
#[derive(Clone)]
pub struct Workflow {
    catalog: Arc<Catalog>,
    metadata: MetadataClient,
    query: QueryEngine,
    resolver: RecommendationResolver,
    sessions: SessionStore,
    config: Arc<WorkflowConfig>,
}

impl Workflow {
    pub fn new(catalog: Arc<Catalog>, metadata: MetadataClient, config: WorkflowConfig) -> Self {
        Self {
            query: QueryEngine::new(catalog.clone(), metadata.clone()),
            resolver: RecommendationResolver::new(catalog.clone(), metadata.clone()),
            catalog,
            metadata,
            sessions: SessionStore::new(),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn query(&self) -> &QueryEngine {
        &self.query
    }

    pub fn resolver(&self) -> &RecommendationResolver {
        &self.resolver
    }

    pub fn metadata(&self) -> &MetadataClient {
        &self.metadata
    }

    /// Discovery feed of the requested size, bounded by `max_feed_size`
    pub async fn feed(&self, size: Option<usize>) -> AppResult<Vec<MovieCard>> {
        let size = self.config.feed_size_for(size)?;
        Ok(self.sample_feed(size).await)
    }

    async fn default_feed(&self) -> Vec<MovieCard> {
        self.sample_feed(self.config.feed_size).await
    }

    async fn sample_feed(&self, size: usize) -> Vec<MovieCard> {
        self.query
            .discovery_feed(size, self.config.feed_with_cast)
            .await
    }

    /// Starts a session on the discovery feed, or on an empty search when the
    /// feed is disabled
    pub async fn create_session(&self) -> Session {
        let context = if self.config.allows(BrowseMode::Feed) {
            BrowseContext::Feed {
                movies: self.default_feed().await,
            }
        } else {
            BrowseContext::Search {
                query: String::new(),
                movies: Vec::new(),
            }
        };

        let session = Session::new(context);
        self.sessions.insert(session.clone()).await;
        tracing::info!(session_id = %session.id, "Session created");
        session
    }

    pub async fn session(&self, id: Uuid) -> AppResult<Session> {
        self.sessions.get(id).await
    }

    /// Drops a session and everything it holds
    pub async fn end_session(&self, id: Uuid) -> AppResult<()> {
        if self.sessions.remove(id).await {
            tracing::info!(session_id = %id, "Session ended");
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Session {} not found", id)))
        }
    }

    /// Runs a browse request and shows its results
    pub async fn browse(&self, id: Uuid, request: BrowseRequest) -> AppResult<Session> {
        self.config.ensure_allowed(request.mode())?;
        self.sessions.get(id).await?;

        let context = self.run_browse(request).await?;
        self.sessions.update(id, |s| s.browse(context)).await
    }

    async fn run_browse(&self, request: BrowseRequest) -> AppResult<BrowseContext> {
        let context = match request {
            BrowseRequest::Feed => BrowseContext::Feed {
                movies: self.default_feed().await,
            },
            BrowseRequest::Search { query } => {
                let movies = self.query.search(&query, self.config.search_limit).await;
                BrowseContext::Search { query, movies }
            }
            BrowseRequest::Genre { genre, page } => {
                let genre: Genre = genre.parse().map_err(AppError::InvalidInput)?;
                let page = page.max(1);
                BrowseContext::Genre {
                    genre,
                    page,
                    movies: self.query.browse_genre(genre, page).await,
                }
            }
            BrowseRequest::Actor { name } => {
                let credits = self.query.search_actor(&name).await;
                BrowseContext::Actor { name, credits }
            }
        };

        Ok(context)
    }

    /// Opens the detail view for a movie on screen or in the catalog
    pub async fn select(&self, id: Uuid, movie_id: MovieId) -> AppResult<Session> {
        let snapshot = self.sessions.get(id).await?;

        let movie = match snapshot.find_selectable(movie_id) {
            Some(Selectable::Card(card)) => self.with_cast(card).await,
            Some(Selectable::Credit(credit)) => {
                self.metadata.card(credit.id, credit.title, true).await
            }
            None => {
                let entry = self.catalog.get(movie_id).ok_or_else(|| {
                    AppError::NotFound(format!("Movie {} is not selectable", movie_id))
                })?;
                self.metadata.card(entry.id, entry.title.clone(), true).await
            }
        };

        let recommendations = self.resolver.recommend_by_id(movie.id).await;

        tracing::info!(
            session_id = %id,
            movie_id = movie.id,
            recommendations = recommendations.movies.len(),
            "Movie selected"
        );

        self.sessions
            .update(id, |s| s.select(movie, recommendations))
            .await
    }

    async fn with_cast(&self, mut card: MovieCard) -> MovieCard {
        if card.cast.is_none() {
            card.cast = Some(self.metadata.cast(card.id).await);
        }
        card
    }

    /// Leaves the detail view, resampling the feed when configured to
    pub async fn back(&self, id: Uuid) -> AppResult<Session> {
        let snapshot = self.sessions.get(id).await?;

        let fresh_feed = if self.config.regenerate_feed_on_back
            && snapshot.back_target() == Some(BrowseMode::Feed)
        {
            Some(self.default_feed().await)
        } else {
            None
        };

        self.sessions
            .update(id, |s| {
                if s.back() {
                    if let Some(movies) = fresh_feed {
                        s.browse(BrowseContext::Feed { movies });
                    }
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            tmdb::{TmdbCredits, TmdbPage},
            CatalogEntry, Cast,
        },
        services::{
            metadata::tests::{client, new_mock, raw_details, summary},
            providers::MockMetadataProvider,
            session::View,
        },
    };

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(
            (1..=6)
                .map(|i| CatalogEntry {
                    title: format!("Movie {}", i),
                    id: i,
                })
                .collect(),
        ))
    }

    fn permissive_mock() -> MockMetadataProvider {
        let mut mock = new_mock();
        mock.expect_movie_details()
            .returning(|id| Ok(raw_details(id)));
        mock.expect_movie_credits()
            .returning(|_| Ok(TmdbCredits::default()));
        mock.expect_recommendations()
            .returning(|_, _| Ok(TmdbPage::of(vec![summary(500, "Related")])));
        mock
    }

    fn workflow(config: WorkflowConfig) -> Workflow {
        Workflow::new(catalog(), client(permissive_mock()), config)
    }

    fn small_feed() -> WorkflowConfig {
        WorkflowConfig {
            feed_size: 3,
            ..WorkflowConfig::default()
        }
    }

    #[tokio::test]
    async fn test_create_session_starts_on_feed() {
        let workflow = workflow(small_feed());
        let session = workflow.create_session().await;

        let View::Browsing {
            context: BrowseContext::Feed { movies },
        } = &session.view
        else {
            panic!("expected feed");
        };
        assert_eq!(movies.len(), 3);
        assert!(movies.iter().all(|m| m.cast.is_some()));
    }

    #[tokio::test]
    async fn test_create_session_without_feed_mode() {
        let workflow = workflow(WorkflowConfig {
            browse_modes: vec![BrowseMode::Search],
            ..WorkflowConfig::default()
        });
        let session = workflow.create_session().await;
        assert!(matches!(
            session.view,
            View::Browsing {
                context: BrowseContext::Search { .. }
            }
        ));
    }

    #[tokio::test]
    async fn test_select_and_back_round() {
        let workflow = workflow(small_feed());
        let session = workflow.create_session().await;

        let browsed = workflow
            .browse(
                session.id,
                BrowseRequest::Search {
                    query: "movie 2".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(!browsed.is_detail());

        let selected = workflow.select(session.id, 2).await.unwrap();
        let View::Detail {
            movie,
            recommendations,
            ..
        } = &selected.view
        else {
            panic!("expected detail view");
        };
        assert_eq!(movie.title, "Movie 2");
        assert_eq!(movie.cast, Some(Cast::Members(Vec::new())));
        assert_eq!(recommendations.movies[0].title, "Related");

        let back = workflow.back(session.id).await.unwrap();
        let View::Browsing {
            context: BrowseContext::Search { query, movies },
        } = &back.view
        else {
            panic!("expected search results");
        };
        assert_eq!(query, "movie 2");
        assert_eq!(movies.len(), 1);
    }

    #[tokio::test]
    async fn test_end_session_removes_it() {
        let workflow = workflow(small_feed());
        let session = workflow.create_session().await;

        workflow.end_session(session.id).await.unwrap();
        assert!(matches!(
            workflow.session(session.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            workflow.end_session(session.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_feed_rejects_oversized_request() {
        let workflow = workflow(WorkflowConfig {
            max_feed_size: 4,
            ..small_feed()
        });

        assert_eq!(workflow.feed(Some(4)).await.unwrap().len(), 4);
        assert!(matches!(
            workflow.feed(Some(5)).await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_select_recommendation_from_detail() {
        let workflow = workflow(small_feed());
        let session = workflow.create_session().await;
        workflow.select(session.id, 4).await.unwrap();

        let next = workflow.select(session.id, 500).await.unwrap();
        assert_eq!(next.selection().unwrap().title, "Related");
    }

    #[tokio::test]
    async fn test_select_unknown_movie() {
        let workflow = workflow(small_feed());
        let session = workflow.create_session().await;

        let result = workflow.select(session.id, 999_999).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_back_keeps_cached_feed_by_default() {
        let workflow = workflow(small_feed());
        let session = workflow.create_session().await;
        let View::Browsing { context: original } = session.view.clone() else {
            panic!("expected browsing");
        };

        workflow.select(session.id, 1).await.unwrap();
        let back = workflow.back(session.id).await.unwrap();
        assert_eq!(back.view, View::Browsing { context: original });
    }

    #[tokio::test]
    async fn test_back_regenerates_feed_when_configured() {
        let workflow = workflow(WorkflowConfig {
            feed_size: 6,
            regenerate_feed_on_back: true,
            ..WorkflowConfig::default()
        });
        let session = workflow.create_session().await;

        workflow.select(session.id, 1).await.unwrap();
        let back = workflow.back(session.id).await.unwrap();
        let View::Browsing {
            context: BrowseContext::Feed { movies },
        } = &back.view
        else {
            panic!("expected feed");
        };
        assert_eq!(movies.len(), 6);
    }

    #[tokio::test]
    async fn test_disabled_mode_rejected() {
        let workflow = workflow(WorkflowConfig {
            browse_modes: vec![BrowseMode::Feed],
            feed_size: 1,
            ..WorkflowConfig::default()
        });
        let session = workflow.create_session().await;

        let result = workflow
            .browse(
                session.id,
                BrowseRequest::Actor {
                    name: "Keanu Reeves".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_unknown_genre_rejected() {
        let workflow = workflow(small_feed());
        let session = workflow.create_session().await;

        let result = workflow
            .browse(
                session.id,
                BrowseRequest::Genre {
                    genre: "Musical".to_string(),
                    page: 1,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let workflow = workflow(small_feed());
        assert!(matches!(
            workflow.back(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
