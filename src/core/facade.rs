use async_trait::async_trait;
use std::sync::Arc;

use crate::core::errors::SearchError;
use crate::core::executor::SearchExecutor;
use crate::core::postcode;
use crate::core::resolver::GeoAuthorityResolver;
use crate::core::strategy;
use crate::models::{
    CatchmentMethod, CourtCatchmentConfig, RankedCourt, SearchAction, ServiceAreaConfig,
    ServiceAreaType,
};

/// Read-only service area and catchment reference data. Maintained by the
/// admin side; a snapshot only has to be consistent within one request.
#[async_trait]
pub trait ReferenceData: Send + Sync {
    async fn service_area(&self, name: &str) -> Result<Option<ServiceAreaConfig>, SearchError>;

    async fn court_catchments(
        &self,
        service_area_id: i64,
    ) -> Result<Vec<CourtCatchmentConfig>, SearchError>;
}

/// Orchestrates a search: validate, geocode, select a strategy, execute.
///
/// All failures from the stages propagate unchanged; the facade adds no
/// error kinds of its own.
pub struct CourtDiscoveryFacade {
    resolver: GeoAuthorityResolver,
    executor: SearchExecutor,
    reference: Arc<dyn ReferenceData>,
}

impl CourtDiscoveryFacade {
    pub fn new(
        resolver: GeoAuthorityResolver,
        executor: SearchExecutor,
        reference: Arc<dyn ReferenceData>,
    ) -> Self {
        Self {
            resolver,
            executor,
            reference,
        }
    }

    /// The single search operation consumed by the HTTP layer.
    ///
    /// `service_area` and `action` must be supplied together; `limit` must
    /// already be clamped to 1..=50 by the caller.
    pub async fn search(
        &self,
        raw_postcode: &str,
        service_area: Option<&str>,
        action: Option<SearchAction>,
        limit: usize,
    ) -> Result<Vec<RankedCourt>, SearchError> {
        let classified = postcode::classify(raw_postcode)?;
        classified.ensure_searchable()?;

        match (service_area, action) {
            (None, None) => {
                let (lat, lon) = self.resolver.resolve_full(&classified.normalized).await?;
                self.executor.nearest(lat, lon, limit).await
            }
            (Some(area_name), Some(action)) => {
                self.search_with_service_area(&classified.outward, area_name, action, limit)
                    .await
            }
            _ => Err(SearchError::InvalidParameterCombination),
        }
    }

    async fn search_with_service_area(
        &self,
        outward: &str,
        area_name: &str,
        action: SearchAction,
        limit: usize,
    ) -> Result<Vec<RankedCourt>, SearchError> {
        let area = self
            .reference
            .service_area(area_name)
            .await?
            .ok_or_else(|| SearchError::ServiceAreaNotFound(area_name.to_string()))?;

        // Designated case types skip strategy selection and go straight to
        // the single point of entry assignment.
        if area.is_single_point_of_entry() {
            let location = self.resolver.resolve_partial(outward).await?;
            return self
                .executor
                .nearest_spoe(&location, &area.area_of_law, limit)
                .await;
        }

        // The authority is only resolved when the strategy could need it;
        // resolution failures are terminal, so they must not fail requests
        // that would never consult the authority.
        let needs_authority = action != SearchAction::Nearest
            && area.area_type == ServiceAreaType::Family
            && area.catchment_method == CatchmentMethod::LocalAuthority;

        let location = if needs_authority {
            self.resolver.resolve_partial_with_authority(outward).await?
        } else {
            self.resolver.resolve_partial(outward).await?
        };

        let catchments = if needs_authority && location.authority_name.is_some() {
            self.reference.court_catchments(area.id).await?
        } else {
            Vec::new()
        };

        let selected = strategy::select(
            action,
            location.authority_name.as_deref(),
            &area,
            &catchments,
        );
        tracing::debug!(
            "selected {:?} for area {} ({:?})",
            selected,
            area.slug,
            action
        );

        self.executor
            .execute(&location, &area, selected, action, limit)
            .await
    }
}
