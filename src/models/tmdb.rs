// ============================================================================
// TMDB API Types
// ============================================================================

use serde::Deserialize;

use super::{
    CastMember, MovieDetails, MovieId, Rating, DEFAULT_OVERVIEW, NO_IMAGE_POSTER,
    UNKNOWN_RELEASE_DATE,
};

/// Response from GET /movie/{id}
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<TmdbGenre>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

impl TmdbMovieDetails {
    /// Converts the raw payload, filling absent fields with display defaults
    pub fn into_details(self, image_base: &str) -> MovieDetails {
        let poster_url = match self.poster_path.filter(|p| !p.is_empty()) {
            Some(path) => format!("{}{}", image_base, path),
            None => NO_IMAGE_POSTER.to_string(),
        };

        let genres = self
            .genres
            .unwrap_or_default()
            .into_iter()
            .map(|g| g.name)
            .collect::<Vec<_>>()
            .join(", ");

        MovieDetails {
            poster_url,
            overview: self.overview.unwrap_or_else(|| DEFAULT_OVERVIEW.to_string()),
            rating: self
                .vote_average
                .map(Rating::Score)
                .unwrap_or(Rating::NotAvailable),
            release_date: self
                .release_date
                .unwrap_or_else(|| UNKNOWN_RELEASE_DATE.to_string()),
            genres,
        }
    }
}

/// Response from GET /movie/{id}/credits
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

impl From<TmdbCastMember> for CastMember {
    fn from(member: TmdbCastMember) -> Self {
        CastMember {
            name: member.name,
            character: member.character.unwrap_or_default(),
        }
    }
}

/// A paged result list (recommendations, discover, person search)
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl<T> TmdbPage<T> {
    pub fn of(results: Vec<T>) -> Self {
        Self {
            page: Some(1),
            results,
            total_pages: Some(1),
        }
    }
}

/// Movie entry in recommendation and discover results
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieSummary {
    pub id: MovieId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

/// Person entry in /search/person results
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPerson {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Response from GET /person/{id}/movie_credits
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbPersonCredits {
    #[serde(default)]
    pub cast: Vec<TmdbPersonCredit>,
}

/// A film the person appeared in; the service occasionally omits title or id
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPersonCredit {
    #[serde(default)]
    pub id: Option<MovieId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

    #[test]
    fn test_details_conversion() {
        let json = r#"{
            "poster_path": "/a.jpg",
            "overview": "O",
            "vote_average": 7.5,
            "release_date": "2008-05-02",
            "genres": [{"id": 28, "name": "Action"}]
        }"#;

        let raw: TmdbMovieDetails = serde_json::from_str(json).unwrap();
        let details = raw.into_details(IMAGE_BASE);

        assert_eq!(details.poster_url, "https://image.tmdb.org/t/p/w500/a.jpg");
        assert_eq!(details.overview, "O");
        assert_eq!(details.rating, Rating::Score(7.5));
        assert_eq!(details.release_date, "2008-05-02");
        assert_eq!(details.genres, "Action");
    }

    #[test]
    fn test_details_defaults_for_missing_fields() {
        let raw: TmdbMovieDetails = serde_json::from_str("{}").unwrap();
        let details = raw.into_details(IMAGE_BASE);

        assert_eq!(details.poster_url, NO_IMAGE_POSTER);
        assert_eq!(details.overview, DEFAULT_OVERVIEW);
        assert_eq!(details.rating, Rating::NotAvailable);
        assert_eq!(details.release_date, "Unknown");
        assert_eq!(details.genres, "");
    }

    #[test]
    fn test_details_null_poster() {
        let raw: TmdbMovieDetails =
            serde_json::from_str(r#"{"poster_path": null, "genres": []}"#).unwrap();
        assert_eq!(raw.into_details(IMAGE_BASE).poster_url, NO_IMAGE_POSTER);
    }

    #[test]
    fn test_genres_joined() {
        let raw: TmdbMovieDetails = serde_json::from_str(
            r#"{"genres": [{"name": "Action"}, {"name": "Science Fiction"}]}"#,
        )
        .unwrap();
        assert_eq!(raw.into_details(IMAGE_BASE).genres, "Action, Science Fiction");
    }

    #[test]
    fn test_page_without_results_is_empty() {
        let page: TmdbPage<TmdbMovieSummary> = serde_json::from_str(r#"{"page": 1}"#).unwrap();
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_person_credit_tolerates_missing_title() {
        let credits: TmdbPersonCredits =
            serde_json::from_str(r#"{"cast": [{"id": 5, "popularity": 1.0}]}"#).unwrap();
        assert_eq!(credits.cast[0].id, Some(5));
        assert!(credits.cast[0].title.is_none());
    }
}
