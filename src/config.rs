use serde::Deserialize;

use crate::services::session::{BrowseMode, WorkflowConfig};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key, sent as the `api_key` query parameter
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix joined with a poster path to build a poster URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Language requested for details and recommendations
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Path to the pre-built catalog (JSON array of `{title, id}`)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of movies sampled for the discovery feed
    #[serde(default = "default_feed_size")]
    pub feed_size: usize,

    /// Upper bound on the `size` a caller may request for the feed
    #[serde(default = "default_max_feed_size")]
    pub max_feed_size: usize,

    /// Whether discovery feed cards carry cast
    #[serde(default = "default_true")]
    pub feed_with_cast: bool,

    /// Cap on search results; unbounded when unset
    #[serde(default)]
    pub search_limit: Option<usize>,

    /// Maximum simultaneous metadata requests during batch enrichment
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// Resample the discovery feed when navigating back to it
    #[serde(default)]
    pub regenerate_feed_on_back: bool,

    /// Comma-separated browse modes: feed, search, genre, actor
    #[serde(default = "default_browse_modes")]
    pub browse_modes: String,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_catalog_path() -> String {
    "movies_list.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_feed_size() -> usize {
    20
}

fn default_max_feed_size() -> usize {
    50
}

fn default_true() -> bool {
    true
}

fn default_fetch_concurrency() -> usize {
    8
}

fn default_browse_modes() -> String {
    "feed,search,genre,actor".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Builds the workflow knobs that select which browse modes are served
    pub fn workflow(&self) -> anyhow::Result<WorkflowConfig> {
        let browse_modes = self
            .browse_modes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<BrowseMode>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid BROWSE_MODES: {}", e))?;

        if browse_modes.is_empty() {
            anyhow::bail!("BROWSE_MODES must enable at least one mode");
        }

        if self.feed_size > self.max_feed_size {
            anyhow::bail!(
                "FEED_SIZE ({}) must not exceed MAX_FEED_SIZE ({})",
                self.feed_size,
                self.max_feed_size
            );
        }

        Ok(WorkflowConfig {
            browse_modes,
            feed_size: self.feed_size,
            max_feed_size: self.max_feed_size,
            feed_with_cast: self.feed_with_cast,
            search_limit: self.search_limit,
            regenerate_feed_on_back: self.regenerate_feed_on_back,
        })
    }
}
