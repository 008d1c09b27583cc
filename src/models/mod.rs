use serde::{Deserialize, Serialize, Serializer};
use std::fmt::Display;

pub mod genre;
pub mod tmdb;

pub use genre::Genre;

/// External (TMDB) movie identifier
pub type MovieId = u64;

/// Poster used when the service knows the movie but has no poster for it
pub const NO_IMAGE_POSTER: &str = "https://via.placeholder.com/500x750?text=No+Image";
/// Poster of the placeholder record substituted on any failed lookup
pub const ERROR_POSTER: &str = "https://via.placeholder.com/500x750?text=Error";
pub const DEFAULT_OVERVIEW: &str = "No overview available.";
pub const UNKNOWN_RELEASE_DATE: &str = "Unknown";
pub const UNKNOWN_GENRES: &str = "Unknown";
pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const CAST_UNAVAILABLE: &str = "Cast information not available";

/// One row of the pre-built catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub id: MovieId,
}

/// Average vote, or `"N/A"` when the service did not supply one
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Score(f64),
    NotAvailable,
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rating::Score(score) => serializer.serialize_f64(*score),
            Rating::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

/// Display metadata for a single movie
///
/// Always complete: a failed lookup yields [`MovieDetails::placeholder`] rather
/// than a partially filled record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetails {
    pub poster_url: String,
    pub overview: String,
    pub rating: Rating,
    pub release_date: String,
    /// Genre names joined with `", "`
    pub genres: String,
}

impl MovieDetails {
    /// The fixed record returned when a details lookup fails
    pub fn placeholder() -> Self {
        Self {
            poster_url: ERROR_POSTER.to_string(),
            overview: DEFAULT_OVERVIEW.to_string(),
            rating: Rating::NotAvailable,
            release_date: UNKNOWN_RELEASE_DATE.to_string(),
            genres: UNKNOWN_GENRES.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastMember {
    pub name: String,
    pub character: String,
}

/// Top-billed cast, or a sentinel when the credits lookup failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cast {
    Members(Vec<CastMember>),
    Unavailable,
}

impl Serialize for Cast {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cast::Members(members) => members.serialize(serializer),
            Cast::Unavailable => serializer.serialize_str(CAST_UNAVAILABLE),
        }
    }
}

/// A movie as handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieCard {
    pub id: MovieId,
    pub title: String,
    #[serde(flatten)]
    pub details: MovieDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<Cast>,
}

/// A movie from an actor's filmography
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonCredit {
    pub id: MovieId,
    pub title: String,
    pub poster_url: String,
}

/// Why a recommendation list came back empty
///
/// These are messages for the user, not failures: the resolver still returns
/// normally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Advisory {
    TitleNotFound(String),
    NoRecommendations(String),
    ServiceUnavailable(String),
}

impl Advisory {
    pub fn title_not_found(title: &str) -> Self {
        Advisory::TitleNotFound(format!("Movie '{}' not found in database", title))
    }

    pub fn no_recommendations() -> Self {
        Advisory::NoRecommendations("No recommendations found for this movie".to_string())
    }

    pub fn service_unavailable(reason: impl Display) -> Self {
        Advisory::ServiceUnavailable(format!("TMDB API error: {}", reason))
    }

    pub fn message(&self) -> &str {
        match self {
            Advisory::TitleNotFound(msg)
            | Advisory::NoRecommendations(msg)
            | Advisory::ServiceUnavailable(msg) => msg,
        }
    }
}

/// Related movies for one source movie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub movies: Vec<MovieCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Advisory>,
}

impl Recommendations {
    pub fn found(movies: Vec<MovieCard>) -> Self {
        Self {
            movies,
            advisory: None,
        }
    }

    pub fn empty(advisory: Advisory) -> Self {
        Self {
            movies: Vec::new(),
            advisory: Some(advisory),
        }
    }
}
