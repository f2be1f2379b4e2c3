//! Disaster Feed - disaster alerts for one country from several public APIs.
//!
//! # Overview
//!
//! The feed asks ReliefWeb, GDACS and NASA EONET for current alerts, in that
//! order, and keeps the first non-empty answer. Every provider's records are
//! normalized into one [`model::DisasterEvent`] shape with a derived
//! [`model::Severity`]. Results are cached in memory for a fixed TTL. If no
//! source answers with data, a static sample set is returned, so callers
//! always receive a list and never an error.
//!
//! # Modules
//!
//! - [`model`]: Event types and display ranking
//! - [`normalize`]: Severity rules, code tables and date parsing
//! - [`data_sources`]: HTTP clients for each provider
//! - [`feed`]: Fallback orchestration and caching
//! - [`cache`]: Time-boxed result cache
//! - [`render`]: HTML output

pub mod cache;
pub mod clock;
pub mod config;
pub mod data_sources;
pub mod error;
pub mod feed;
pub mod model;
pub mod normalize;
pub mod render;
pub mod sample;
