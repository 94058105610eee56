//! Movie discovery service backed by TMDB
//!
//! Search, curated top lists, filtered discovery, descriptive analysis and
//! a content-based recommender, exposed as a JSON API.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
