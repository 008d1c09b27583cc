pub mod catalog;
pub mod metadata;
pub mod providers;
pub mod query;
pub mod recommendations;
pub mod session;
pub mod workflow;

pub use catalog::Catalog;
pub use metadata::MetadataClient;
pub use providers::{MetadataProvider, TmdbProvider};
pub use query::QueryEngine;
pub use recommendations::RecommendationResolver;
pub use workflow::Workflow;
