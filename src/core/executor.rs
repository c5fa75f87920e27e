use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::core::errors::SearchError;
use crate::core::strategy::SearchStrategy;
use crate::models::{CourtCandidate, LocationResult, RankedCourt, SearchAction, ServiceAreaConfig};

/// External ranked-court lookups. The geospatial ranking itself is a black
/// box behind this trait; the executor only depends on the returned shape.
#[async_trait]
pub trait CourtQueries: Send + Sync {
    /// Nearest courts regardless of area of law.
    async fn find_nearest(
        &self,
        lat: f64,
        lon: f64,
        limit: usize,
    ) -> Result<Vec<CourtCandidate>, SearchError>;

    /// Nearest courts offering the given area of law.
    async fn find_nearest_by_area_of_law(
        &self,
        lat: f64,
        lon: f64,
        area_of_law: &str,
        limit: usize,
    ) -> Result<Vec<CourtCandidate>, SearchError>;

    /// Courts offering the area of law, with the `postcode_match` flag set
    /// where the court's postcode-district catchment contains the postcode.
    async fn find_by_postcode_catchment(
        &self,
        lat: f64,
        lon: f64,
        area_of_law: &str,
        postcode: &str,
    ) -> Result<Vec<CourtCandidate>, SearchError>;

    /// Courts with a regional catchment for the service area, restricted to
    /// the region grouping of the search origin.
    async fn find_regional(
        &self,
        lat: f64,
        lon: f64,
        service_area_id: i64,
    ) -> Result<Vec<CourtCandidate>, SearchError>;

    /// Courts whose local catchment for the service area is mapped to the
    /// given local authority.
    async fn find_by_local_authority(
        &self,
        lat: f64,
        lon: f64,
        authority_name: &str,
        service_area_id: i64,
    ) -> Result<Vec<CourtCandidate>, SearchError>;

    /// Single-point-of-entry courts for the area of law.
    async fn find_nearest_spoe(
        &self,
        lat: f64,
        lon: f64,
        area_of_law: &str,
    ) -> Result<Vec<CourtCandidate>, SearchError>;
}

/// Runs the selected strategy against the ranked-court queries.
pub struct SearchExecutor {
    queries: Arc<dyn CourtQueries>,
}

impl SearchExecutor {
    pub fn new(queries: Arc<dyn CourtQueries>) -> Self {
        Self { queries }
    }

    /// Plain proximity search, used when no service area is supplied.
    pub async fn nearest(
        &self,
        lat: f64,
        lon: f64,
        limit: usize,
    ) -> Result<Vec<RankedCourt>, SearchError> {
        let candidates = self.queries.find_nearest(lat, lon, limit).await?;
        Ok(rank(candidates, limit, true))
    }

    /// Single-point-of-entry routing: a fixed assignment set, distance-ranked
    /// within it but not a proximity outcome.
    pub async fn nearest_spoe(
        &self,
        location: &LocationResult,
        area_of_law: &str,
        limit: usize,
    ) -> Result<Vec<RankedCourt>, SearchError> {
        let candidates = self
            .queries
            .find_nearest_spoe(location.latitude, location.longitude, area_of_law)
            .await?;
        Ok(rank(candidates, limit, false))
    }

    /// Run a strategy-driven search. An empty candidate list is a valid
    /// outcome, never converted into an error.
    pub async fn execute(
        &self,
        location: &LocationResult,
        service_area: &ServiceAreaConfig,
        strategy: SearchStrategy,
        _action: SearchAction,
        limit: usize,
    ) -> Result<Vec<RankedCourt>, SearchError> {
        let lat = location.latitude;
        let lon = location.longitude;

        let candidates = match strategy {
            SearchStrategy::DefaultAolDistance => {
                self.queries
                    .find_nearest_by_area_of_law(lat, lon, &service_area.area_of_law, limit)
                    .await?
            }
            SearchStrategy::CivilPostcodePreference => {
                let mut candidates = self
                    .queries
                    .find_by_postcode_catchment(
                        lat,
                        lon,
                        &service_area.area_of_law,
                        &location.outward_code,
                    )
                    .await?;
                // Compound key: catchment match outranks distance.
                candidates.sort_by(|a, b| {
                    b.postcode_match
                        .cmp(&a.postcode_match)
                        .then_with(|| by_distance(a, b))
                });
                candidates
            }
            SearchStrategy::FamilyRegional => {
                self.queries
                    .find_regional(lat, lon, service_area.id)
                    .await?
            }
            SearchStrategy::FamilyNonRegional => {
                let candidates = match location.authority_name.as_deref() {
                    Some(authority) => {
                        self.queries
                            .find_by_local_authority(lat, lon, authority, service_area.id)
                            .await?
                    }
                    None => Vec::new(),
                };
                if candidates.is_empty() {
                    // An unmapped local-authority catchment falls back to
                    // plain distance over the area of law.
                    self.queries
                        .find_nearest_by_area_of_law(lat, lon, &service_area.area_of_law, limit)
                        .await?
                } else {
                    candidates
                }
            }
        };

        tracing::debug!(
            "strategy {:?} produced {} candidates for {}",
            strategy,
            candidates.len(),
            location.outward_code
        );

        Ok(rank(candidates, limit, true))
    }
}

/// Distance ordering with unknown distances last.
fn by_distance(a: &CourtCandidate, b: &CourtCandidate) -> Ordering {
    match (a.distance, b.distance) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn rank(candidates: Vec<CourtCandidate>, limit: usize, by_proximity: bool) -> Vec<RankedCourt> {
    candidates
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, c)| RankedCourt {
            slug: c.slug,
            name: c.name,
            distance_miles: c.distance,
            rank: (i + 1) as u32,
            by_proximity,
        })
        .collect()
}
