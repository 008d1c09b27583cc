use std::{collections::HashMap, fmt::Display, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Genre, MovieCard, MovieId, PersonCredit, Recommendations},
};

/// The ways a session can browse for movies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowseMode {
    Feed,
    Search,
    Genre,
    Actor,
}

impl BrowseMode {
    pub const ALL: [BrowseMode; 4] = [
        BrowseMode::Feed,
        BrowseMode::Search,
        BrowseMode::Genre,
        BrowseMode::Actor,
    ];
}

impl Display for BrowseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BrowseMode::Feed => "feed",
            BrowseMode::Search => "search",
            BrowseMode::Genre => "genre",
            BrowseMode::Actor => "actor",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for BrowseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BrowseMode::ALL
            .into_iter()
            .find(|mode| mode.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown browse mode: {}", s))
    }
}

/// Knobs that select one configuration of the browsing workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowConfig {
    pub browse_modes: Vec<BrowseMode>,
    pub feed_size: usize,
    /// Largest feed a caller may request explicitly
    pub max_feed_size: usize,
    pub feed_with_cast: bool,
    pub search_limit: Option<usize>,
    pub regenerate_feed_on_back: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            browse_modes: BrowseMode::ALL.to_vec(),
            feed_size: 20,
            max_feed_size: 50,
            feed_with_cast: true,
            search_limit: None,
            regenerate_feed_on_back: false,
        }
    }
}

impl WorkflowConfig {
    pub fn allows(&self, mode: BrowseMode) -> bool {
        self.browse_modes.contains(&mode)
    }

    /// Rejects requests for a mode this deployment does not serve
    pub fn ensure_allowed(&self, mode: BrowseMode) -> AppResult<()> {
        if self.allows(mode) {
            Ok(())
        } else {
            Err(AppError::InvalidInput(format!(
                "Browse mode '{}' is not enabled",
                mode
            )))
        }
    }

    /// Resolves a requested feed size, falling back to `feed_size`
    pub fn feed_size_for(&self, requested: Option<usize>) -> AppResult<usize> {
        match requested {
            None => Ok(self.feed_size),
            Some(size) if size <= self.max_feed_size => Ok(size),
            Some(size) => Err(AppError::InvalidInput(format!(
                "Feed size {} exceeds the maximum of {}",
                size, self.max_feed_size
            ))),
        }
    }
}

fn first_page() -> u32 {
    1
}

/// A browse action requested by the user
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BrowseRequest {
    Feed,
    Search {
        query: String,
    },
    Genre {
        genre: String,
        #[serde(default = "first_page")]
        page: u32,
    },
    Actor {
        name: String,
    },
}

impl BrowseRequest {
    pub fn mode(&self) -> BrowseMode {
        match self {
            BrowseRequest::Feed => BrowseMode::Feed,
            BrowseRequest::Search { .. } => BrowseMode::Search,
            BrowseRequest::Genre { .. } => BrowseMode::Genre,
            BrowseRequest::Actor { .. } => BrowseMode::Actor,
        }
    }
}

/// What the user is currently browsing, with the results on screen
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BrowseContext {
    Feed {
        movies: Vec<MovieCard>,
    },
    Search {
        query: String,
        movies: Vec<MovieCard>,
    },
    Genre {
        genre: Genre,
        page: u32,
        movies: Vec<MovieCard>,
    },
    Actor {
        name: String,
        credits: Vec<PersonCredit>,
    },
}

impl BrowseContext {
    pub fn mode(&self) -> BrowseMode {
        match self {
            BrowseContext::Feed { .. } => BrowseMode::Feed,
            BrowseContext::Search { .. } => BrowseMode::Search,
            BrowseContext::Genre { .. } => BrowseMode::Genre,
            BrowseContext::Actor { .. } => BrowseMode::Actor,
        }
    }

    fn movies(&self) -> &[MovieCard] {
        match self {
            BrowseContext::Feed { movies }
            | BrowseContext::Search { movies, .. }
            | BrowseContext::Genre { movies, .. } => movies.as_slice(),
            BrowseContext::Actor { .. } => &[],
        }
    }

    fn credit(&self, id: MovieId) -> Option<&PersonCredit> {
        match self {
            BrowseContext::Actor { credits, .. } => credits.iter().find(|c| c.id == id),
            _ => None,
        }
    }
}

/// The two states of a browsing session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum View {
    Browsing {
        context: BrowseContext,
    },
    Detail {
        movie: MovieCard,
        recommendations: Recommendations,
        /// Where `back` returns to
        #[serde(skip)]
        previous: Box<BrowseContext>,
    },
}

/// Where a selectable movie was found in the current view
#[derive(Debug, Clone, PartialEq)]
pub enum Selectable {
    Card(MovieCard),
    Credit(PersonCredit),
}

/// One user's browsing state
///
/// At most one movie is selected at a time. Transitions are
/// `Browsing -> Detail` on select and `Detail -> Browsing` on back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub view: View,
}

impl Session {
    pub fn new(context: BrowseContext) -> Self {
        Self {
            id: Uuid::new_v4(),
            view: View::Browsing { context },
        }
    }

    pub fn is_detail(&self) -> bool {
        matches!(self.view, View::Detail { .. })
    }

    /// The selected movie, if any
    pub fn selection(&self) -> Option<&MovieCard> {
        match &self.view {
            View::Detail { movie, .. } => Some(movie),
            View::Browsing { .. } => None,
        }
    }

    /// Shows new browse results, leaving any detail view
    pub fn browse(&mut self, context: BrowseContext) {
        self.view = View::Browsing { context };
    }

    /// Enters the detail view for `movie`
    ///
    /// Selecting from a detail view (a recommendation) keeps the original
    /// browse context as the `back` target.
    pub fn select(&mut self, movie: MovieCard, recommendations: Recommendations) {
        let previous = match std::mem::replace(
            &mut self.view,
            View::Browsing {
                context: BrowseContext::Feed { movies: Vec::new() },
            },
        ) {
            View::Browsing { context } => Box::new(context),
            View::Detail { previous, .. } => previous,
        };

        self.view = View::Detail {
            movie,
            recommendations,
            previous,
        };
    }

    /// Returns to the browse context the detail view was entered from
    ///
    /// Returns `false` when already browsing.
    pub fn back(&mut self) -> bool {
        let View::Detail { previous, .. } = &self.view else {
            return false;
        };

        let context = (**previous).clone();
        self.view = View::Browsing { context };
        true
    }

    /// The browse mode `back` would return to
    pub fn back_target(&self) -> Option<BrowseMode> {
        match &self.view {
            View::Detail { previous, .. } => Some(previous.mode()),
            View::Browsing { .. } => None,
        }
    }

    /// Finds a movie on screen by id: browse results, the selected movie, or its
    /// recommendations
    pub fn find_selectable(&self, id: MovieId) -> Option<Selectable> {
        match &self.view {
            View::Browsing { context } => context
                .movies()
                .iter()
                .find(|m| m.id == id)
                .cloned()
                .map(Selectable::Card)
                .or_else(|| context.credit(id).cloned().map(Selectable::Credit)),
            View::Detail {
                movie,
                recommendations,
                ..
            } => std::iter::once(movie)
                .chain(recommendations.movies.iter())
                .find(|m| m.id == id)
                .cloned()
                .map(Selectable::Card),
        }
    }
}

/// In-memory sessions keyed by id
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: Session) {
        self.inner.write().await.insert(session.id, session);
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Session> {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))
    }

    /// Applies `f` under the write lock and returns the updated session
    pub async fn update<F>(&self, id: Uuid, f: F) -> AppResult<Session>
    where
        F: FnOnce(&mut Session),
    {
        let mut sessions = self.inner.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;
        f(session);
        Ok(session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieDetails;

    fn card(id: MovieId, title: &str) -> MovieCard {
        MovieCard {
            id,
            title: title.to_string(),
            details: MovieDetails::placeholder(),
            cast: None,
        }
    }

    fn search_context() -> BrowseContext {
        BrowseContext::Search {
            query: "iron".to_string(),
            movies: vec![card(1, "Iron Man"), card(2, "IRONCLAD")],
        }
    }

    #[test]
    fn test_select_then_back_restores_context() {
        let mut session = Session::new(search_context());
        assert!(!session.is_detail());

        session.select(card(1, "Iron Man"), Recommendations::found(Vec::new()));
        assert!(session.is_detail());
        assert_eq!(session.selection().unwrap().title, "Iron Man");
        assert_eq!(session.back_target(), Some(BrowseMode::Search));

        assert!(session.back());
        assert_eq!(
            session.view,
            View::Browsing {
                context: search_context()
            }
        );
    }

    #[test]
    fn test_back_while_browsing_is_noop() {
        let mut session = Session::new(search_context());
        assert!(!session.back());
        assert!(session.selection().is_none());
    }

    #[test]
    fn test_selecting_recommendation_keeps_original_back_target() {
        let mut session = Session::new(search_context());
        session.select(
            card(1, "Iron Man"),
            Recommendations::found(vec![card(10138, "Iron Man 2")]),
        );

        let Some(Selectable::Card(next)) = session.find_selectable(10138) else {
            panic!("recommendation should be selectable");
        };
        session.select(next, Recommendations::found(Vec::new()));

        assert_eq!(session.selection().unwrap().id, 10138);
        assert!(session.back());
        assert_eq!(
            session.view,
            View::Browsing {
                context: search_context()
            }
        );
    }

    #[test]
    fn test_find_selectable_in_actor_credits() {
        let session = Session::new(BrowseContext::Actor {
            name: "Keanu Reeves".to_string(),
            credits: vec![PersonCredit {
                id: 603,
                title: "The Matrix".to_string(),
                poster_url: "p".to_string(),
            }],
        });

        assert!(matches!(
            session.find_selectable(603),
            Some(Selectable::Credit(_))
        ));
        assert!(session.find_selectable(604).is_none());
    }

    #[test]
    fn test_browse_leaves_detail() {
        let mut session = Session::new(search_context());
        session.select(card(1, "Iron Man"), Recommendations::found(Vec::new()));
        session.browse(BrowseContext::Feed { movies: Vec::new() });
        assert!(!session.is_detail());
    }

    #[test]
    fn test_detail_view_serialization_hides_back_target() {
        let mut session = Session::new(search_context());
        session.select(card(1, "Iron Man"), Recommendations::found(Vec::new()));

        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["view"]["state"], "detail");
        assert_eq!(value["view"]["movie"]["title"], "Iron Man");
        assert!(value["view"].get("previous").is_none());
    }

    #[test]
    fn test_browse_request_deserialization() {
        let request: BrowseRequest =
            serde_json::from_str(r#"{"mode": "genre", "genre": "Horror"}"#).unwrap();
        assert_eq!(
            request,
            BrowseRequest::Genre {
                genre: "Horror".to_string(),
                page: 1
            }
        );
        assert_eq!(request.mode(), BrowseMode::Genre);
    }

    #[test]
    fn test_browse_mode_parse() {
        assert_eq!("Actor".parse::<BrowseMode>(), Ok(BrowseMode::Actor));
        assert!("charts".parse::<BrowseMode>().is_err());
    }

    #[test]
    fn test_workflow_config_allows() {
        let config = WorkflowConfig {
            browse_modes: vec![BrowseMode::Search],
            ..WorkflowConfig::default()
        };
        assert!(config.ensure_allowed(BrowseMode::Search).is_ok());
        assert!(matches!(
            config.ensure_allowed(BrowseMode::Actor),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_feed_size_bounds() {
        let config = WorkflowConfig {
            feed_size: 10,
            max_feed_size: 30,
            ..WorkflowConfig::default()
        };
        assert_eq!(config.feed_size_for(None).unwrap(), 10);
        assert_eq!(config.feed_size_for(Some(30)).unwrap(), 30);
        assert!(matches!(
            config.feed_size_for(Some(31)),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_store_update_and_missing_session() {
        let store = SessionStore::new();
        let session = Session::new(search_context());
        let id = session.id;
        store.insert(session).await;

        let updated = store
            .update(id, |s| s.select(card(2, "IRONCLAD"), Recommendations::found(Vec::new())))
            .await
            .unwrap();
        assert!(updated.is_detail());
        assert!(store.get(id).await.unwrap().is_detail());

        let missing = store.get(Uuid::new_v4()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));

        assert!(store.remove(id).await);
        assert!(store.get(id).await.is_err());
        assert!(!store.remove(id).await);
    }
}
