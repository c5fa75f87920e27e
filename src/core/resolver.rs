use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;

use crate::core::errors::SearchError;
use crate::models::{GeocodeResponse, LocationResult};

/// Failure modes of the geocoding provider, kept separate from the search
/// taxonomy so the resolver decides how each maps onto it.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The provider rejected the postcode itself (HTTP 4xx equivalent)
    #[error("provider rejected the postcode (status {status})")]
    Rejected { status: u16 },

    /// Transport failure, timeout, or a provider-side error
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// External geocoding provider contract
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    async fn geocode_full(&self, postcode: &str) -> Result<GeocodeResponse, GeocodeError>;

    async fn geocode_partial(
        &self,
        outward: &str,
        max_results: u32,
    ) -> Result<GeocodeResponse, GeocodeError>;
}

/// Custodian-code to local-authority name lookup; parent-or-child resolution
/// happens behind this trait.
#[async_trait]
pub trait AuthorityLookup: Send + Sync {
    async fn authority_name(&self, custodian_code: i64) -> Result<Option<String>, SearchError>;
}

/// Addresses fetched per outward-code lookup when custodian codes are
/// needed. Must cover enough of the district to observe every authority
/// it straddles.
const AUTHORITY_SAMPLE_SIZE: u32 = 100;

/// Resolves a postcode to coordinates and, when needed, a single
/// unambiguous local authority.
pub struct GeoAuthorityResolver {
    geocoder: Arc<dyn GeocodingProvider>,
    authorities: Arc<dyn AuthorityLookup>,
}

impl GeoAuthorityResolver {
    pub fn new(geocoder: Arc<dyn GeocodingProvider>, authorities: Arc<dyn AuthorityLookup>) -> Self {
        Self {
            geocoder,
            authorities,
        }
    }

    /// Exact-match geocode of a complete postcode.
    pub async fn resolve_full(&self, postcode: &str) -> Result<(f64, f64), SearchError> {
        let response = self
            .geocoder
            .geocode_full(postcode)
            .await
            .map_err(|e| map_geocode_error(e, postcode))?;

        let first = response
            .results
            .first()
            .ok_or_else(|| SearchError::NoAddressResults(postcode.to_string()))?;

        Ok((first.lat, first.lng))
    }

    /// Outward-style geocode returning coordinates only. Used when the
    /// selected strategy cannot need a local authority.
    pub async fn resolve_partial(&self, outward: &str) -> Result<LocationResult, SearchError> {
        let response = self
            .geocoder
            .geocode_partial(outward, 1)
            .await
            .map_err(|e| map_geocode_error(e, outward))?;

        let first = response
            .results
            .first()
            .ok_or_else(|| SearchError::NoAddressResults(outward.to_string()))?;

        Ok(LocationResult {
            latitude: first.lat,
            longitude: first.lng,
            authority_name: None,
            outward_code: outward.to_string(),
        })
    }

    /// Outward-style geocode that also resolves the local authority from the
    /// custodian codes in the response.
    ///
    /// Null custodian codes are tolerated and skipped. Every remaining code
    /// must resolve to the same authority name; conflicting resolutions are
    /// surfaced as `AmbiguousAuthority`, never silently tie-broken.
    pub async fn resolve_partial_with_authority(
        &self,
        outward: &str,
    ) -> Result<LocationResult, SearchError> {
        let response = self
            .geocoder
            .geocode_partial(outward, AUTHORITY_SAMPLE_SIZE)
            .await
            .map_err(|e| map_geocode_error(e, outward))?;

        let first = response
            .results
            .first()
            .copied()
            .ok_or_else(|| SearchError::NoAddressResults(outward.to_string()))?;

        let mut codes: Vec<i64> = response
            .results
            .iter()
            .filter_map(|r| r.custodian_code)
            .collect();
        codes.sort_unstable();
        codes.dedup();

        if codes.is_empty() {
            return Err(SearchError::NoCustodianCode(outward.to_string()));
        }

        let mut resolved: BTreeMap<i64, String> = BTreeMap::new();
        for code in codes {
            match self.authorities.authority_name(code).await? {
                Some(name) => {
                    resolved.insert(code, name);
                }
                None => return Err(SearchError::AuthorityNotFound(code)),
            }
        }

        let distinct: BTreeSet<&str> = resolved.values().map(String::as_str).collect();
        if distinct.len() > 1 {
            let conflicts = resolved
                .iter()
                .map(|(code, name)| format!("{code}={name}"))
                .collect();
            return Err(SearchError::AmbiguousAuthority { conflicts });
        }

        let authority_name = resolved.into_values().next();
        tracing::debug!("resolved {} to authority {:?}", outward, authority_name);

        Ok(LocationResult {
            latitude: first.lat,
            longitude: first.lng,
            authority_name,
            outward_code: outward.to_string(),
        })
    }
}

fn map_geocode_error(err: GeocodeError, postcode: &str) -> SearchError {
    match err {
        GeocodeError::Rejected { status } => {
            SearchError::InvalidPostcode(format!("{postcode} (rejected by provider, status {status})"))
        }
        GeocodeError::Unavailable(message) => SearchError::GeocodingUnavailable(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeocodeResult;
    use std::collections::HashMap;

    struct FakeGeocoder {
        response: Result<GeocodeResponse, GeocodeError>,
    }

    #[async_trait]
    impl GeocodingProvider for FakeGeocoder {
        async fn geocode_full(&self, _postcode: &str) -> Result<GeocodeResponse, GeocodeError> {
            clone_response(&self.response)
        }

        async fn geocode_partial(
            &self,
            _outward: &str,
            _max_results: u32,
        ) -> Result<GeocodeResponse, GeocodeError> {
            clone_response(&self.response)
        }
    }

    fn clone_response(
        response: &Result<GeocodeResponse, GeocodeError>,
    ) -> Result<GeocodeResponse, GeocodeError> {
        match response {
            Ok(r) => Ok(r.clone()),
            Err(GeocodeError::Rejected { status }) => Err(GeocodeError::Rejected { status: *status }),
            Err(GeocodeError::Unavailable(m)) => Err(GeocodeError::Unavailable(m.clone())),
        }
    }

    struct FakeAuthorities {
        names: HashMap<i64, String>,
    }

    #[async_trait]
    impl AuthorityLookup for FakeAuthorities {
        async fn authority_name(&self, custodian_code: i64) -> Result<Option<String>, SearchError> {
            Ok(self.names.get(&custodian_code).cloned())
        }
    }

    fn resolver(
        results: Vec<GeocodeResult>,
        names: &[(i64, &str)],
    ) -> GeoAuthorityResolver {
        GeoAuthorityResolver::new(
            Arc::new(FakeGeocoder {
                response: Ok(GeocodeResponse { results }),
            }),
            Arc::new(FakeAuthorities {
                names: names
                    .iter()
                    .map(|(code, name)| (*code, name.to_string()))
                    .collect(),
            }),
        )
    }

    fn entry(code: Option<i64>) -> GeocodeResult {
        GeocodeResult {
            custodian_code: code,
            lat: 51.5,
            lng: -0.12,
        }
    }

    #[tokio::test]
    async fn test_resolve_full_returns_first_coordinates() {
        let resolver = resolver(vec![entry(Some(111))], &[]);
        let (lat, lng) = resolver.resolve_full("SW1A 1AA").await.unwrap();
        assert_eq!(lat, 51.5);
        assert_eq!(lng, -0.12);
    }

    #[tokio::test]
    async fn test_resolve_full_empty_results_is_no_address() {
        let resolver = resolver(vec![], &[]);
        let err = resolver.resolve_full("SW1A 1AA").await.unwrap_err();
        assert!(matches!(err, SearchError::NoAddressResults(_)));
    }

    #[tokio::test]
    async fn test_rejected_postcode_maps_to_invalid_postcode() {
        let resolver = GeoAuthorityResolver::new(
            Arc::new(FakeGeocoder {
                response: Err(GeocodeError::Rejected { status: 400 }),
            }),
            Arc::new(FakeAuthorities {
                names: HashMap::new(),
            }),
        );
        let err = resolver.resolve_full("BAD").await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidPostcode(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_unavailable() {
        let resolver = GeoAuthorityResolver::new(
            Arc::new(FakeGeocoder {
                response: Err(GeocodeError::Unavailable("timed out".to_string())),
            }),
            Arc::new(FakeAuthorities {
                names: HashMap::new(),
            }),
        );
        let err = resolver.resolve_partial("OX14").await.unwrap_err();
        assert!(matches!(err, SearchError::GeocodingUnavailable(_)));
    }

    #[tokio::test]
    async fn test_matching_codes_resolve_to_single_authority() {
        // Scenario: codes 111 and 222 both map to "Authority Name"
        let resolver = resolver(
            vec![entry(Some(111)), entry(Some(222))],
            &[(111, "Authority Name"), (222, "Authority Name")],
        );
        let location = resolver.resolve_partial_with_authority("OX14").await.unwrap();
        assert_eq!(location.authority_name.as_deref(), Some("Authority Name"));
        assert_eq!(location.outward_code, "OX14");
    }

    #[tokio::test]
    async fn test_conflicting_codes_are_ambiguous() {
        let resolver = resolver(
            vec![entry(Some(111)), entry(Some(222))],
            &[(111, "Authority One"), (222, "Authority Two")],
        );
        let err = resolver
            .resolve_partial_with_authority("M1")
            .await
            .unwrap_err();
        match err {
            SearchError::AmbiguousAuthority { conflicts } => {
                assert_eq!(conflicts, vec!["111=Authority One", "222=Authority Two"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolution_is_order_independent() {
        let forward = resolver(
            vec![entry(Some(111)), entry(Some(222))],
            &[(111, "Authority Name"), (222, "Authority Name")],
        );
        let reversed = resolver(
            vec![entry(Some(222)), entry(Some(111))],
            &[(111, "Authority Name"), (222, "Authority Name")],
        );

        let a = forward.resolve_partial_with_authority("OX14").await.unwrap();
        let b = reversed.resolve_partial_with_authority("OX14").await.unwrap();
        assert_eq!(a.authority_name, b.authority_name);
    }

    #[tokio::test]
    async fn test_null_custodian_codes_are_skipped() {
        let resolver = resolver(
            vec![entry(None), entry(Some(111)), entry(None)],
            &[(111, "Authority Name")],
        );
        let location = resolver.resolve_partial_with_authority("OX14").await.unwrap();
        assert_eq!(location.authority_name.as_deref(), Some("Authority Name"));
    }

    #[tokio::test]
    async fn test_all_null_codes_is_no_custodian_code() {
        let resolver = resolver(vec![entry(None), entry(None)], &[]);
        let err = resolver
            .resolve_partial_with_authority("OX14")
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::NoCustodianCode(_)));
    }

    #[tokio::test]
    async fn test_unmapped_code_is_authority_not_found() {
        let resolver = resolver(vec![entry(Some(999))], &[(111, "Authority Name")]);
        let err = resolver
            .resolve_partial_with_authority("OX14")
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::AuthorityNotFound(999)));
    }

    #[tokio::test]
    async fn test_resolve_partial_leaves_authority_unset() {
        let resolver = resolver(vec![entry(Some(111))], &[(111, "Authority Name")]);
        let location = resolver.resolve_partial("OX14").await.unwrap();
        assert_eq!(location.authority_name, None);
    }
}
