//! Courtfinder - court and tribunal search for England and Wales
//!
//! This library locates the correct court(s) for a citizen given a postcode
//! and, optionally, a legal service area and desired action. It combines
//! postcode validation, external geocoding with local-authority ambiguity
//! resolution, and a multi-strategy jurisdictional routing engine.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    classify, CourtDiscoveryFacade, CourtQueries, GeoAuthorityResolver, ReferenceData, Region,
    SearchError, SearchExecutor, SearchStrategy,
};
pub use models::{RankedCourt, SearchAction, ServiceAreaConfig};
