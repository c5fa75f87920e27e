use serde::{Deserialize, Serialize};

use crate::models::{
    CatchmentMethod, CatchmentType, CourtCatchmentConfig, SearchAction, ServiceAreaConfig,
    ServiceAreaType,
};

/// How candidate courts are selected and ranked for a search.
///
/// Purely derived per request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    DefaultAolDistance,
    CivilPostcodePreference,
    FamilyRegional,
    FamilyNonRegional,
}

/// Select the search strategy for a request. Pure function, no I/O.
///
/// Decision order, first match wins:
/// 1. NEAREST always uses plain distance ranking.
/// 2. Civil areas rank by postcode-prefix preference.
/// 3. Family areas without a resolved authority fall back to distance.
/// 4. Family areas with local-authority catchment pick regional or
///    non-regional depending on whether any associated court has a
///    regional catchment.
/// 5. Everything else falls back to distance.
pub fn select(
    action: SearchAction,
    authority_name: Option<&str>,
    service_area: &ServiceAreaConfig,
    catchments: &[CourtCatchmentConfig],
) -> SearchStrategy {
    if action == SearchAction::Nearest {
        return SearchStrategy::DefaultAolDistance;
    }

    match service_area.area_type {
        ServiceAreaType::Civil => SearchStrategy::CivilPostcodePreference,
        ServiceAreaType::Family => {
            let authority_present = authority_name.is_some_and(|a| !a.trim().is_empty());
            if !authority_present {
                return SearchStrategy::DefaultAolDistance;
            }
            if service_area.catchment_method == CatchmentMethod::LocalAuthority {
                let any_regional = catchments
                    .iter()
                    .any(|c| c.catchment_type == CatchmentType::Regional);
                if any_regional {
                    SearchStrategy::FamilyRegional
                } else {
                    SearchStrategy::FamilyNonRegional
                }
            } else {
                SearchStrategy::DefaultAolDistance
            }
        }
        ServiceAreaType::Other => SearchStrategy::DefaultAolDistance,
    }
}
