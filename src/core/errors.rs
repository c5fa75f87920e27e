use thiserror::Error;

use crate::core::postcode::Region;

/// Errors that can terminate a search request.
///
/// Every kind here is terminal; there are no retries inside the search core.
/// "No qualifying court" is not an error but an empty result list.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid postcode: {0}")]
    InvalidPostcode(String),

    #[error("postcode {postcode} is in {region}; only England and Wales is searchable")]
    UnsupportedRegion { postcode: String, region: Region },

    #[error("no addresses found for postcode {0}")]
    NoAddressResults(String),

    #[error("no local custodian code returned for {0}")]
    NoCustodianCode(String),

    #[error("custodian codes resolve to different local authorities: {conflicts:?}")]
    AmbiguousAuthority { conflicts: Vec<String> },

    #[error("no local authority is mapped for custodian code {0}")]
    AuthorityNotFound(i64),

    #[error("geocoding provider unavailable: {0}")]
    GeocodingUnavailable(String),

    #[error("unknown service area: {0}")]
    ServiceAreaNotFound(String),

    #[error("serviceArea and action must be supplied together")]
    InvalidParameterCombination,

    #[error("backend query failed")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SearchError {
    /// Wrap a collaborator infrastructure failure.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }

    /// Stable machine-readable name for the error kind, used by the HTTP
    /// layer's error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPostcode(_) => "invalid_postcode",
            Self::UnsupportedRegion { .. } => "unsupported_region",
            Self::NoAddressResults(_) => "no_address_results",
            Self::NoCustodianCode(_) => "no_custodian_code",
            Self::AmbiguousAuthority { .. } => "ambiguous_authority",
            Self::AuthorityNotFound(_) => "authority_not_found",
            Self::GeocodingUnavailable(_) => "geocoding_unavailable",
            Self::ServiceAreaNotFound(_) => "service_area_not_found",
            Self::InvalidParameterCombination => "invalid_parameter_combination",
            Self::Backend(_) => "backend_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_region_message_names_the_region() {
        let err = SearchError::UnsupportedRegion {
            postcode: "EH1 1YZ".to_string(),
            region: Region::Scotland,
        };
        assert!(err.to_string().contains("Scotland"));
        assert_eq!(err.kind(), "unsupported_region");
    }

    #[test]
    fn test_backend_wraps_source() {
        let err = SearchError::backend(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(err.kind(), "backend_error");
        assert!(std::error::Error::source(&err).is_some());
    }
}
