//! Movie lookup and recommendation workflow over a local catalog and TMDB.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
