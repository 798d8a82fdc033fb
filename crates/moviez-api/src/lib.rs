//! API client library for moviez.
//!
//! Provides the TMDB movie listing client and the page window used by
//! pagination controls.

/// Page window calculation and pagination actions.
pub mod pagination;

/// TMDB API client.
pub mod tmdb;
