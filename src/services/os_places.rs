use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::core::resolver::{GeocodeError, GeocodingProvider};
use crate::models::{GeocodeResponse, GeocodeResult};

/// OS Places API client
///
/// Only the postcode endpoint is used. The provider's own matching
/// algorithm is out of scope; this client just maps its response shape
/// and failure modes onto the `GeocodingProvider` contract.
pub struct OsPlacesClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl OsPlacesClient {
    /// Create a new client; `timeout` bounds every call to the provider.
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            client,
        }
    }

    async fn postcode_lookup(
        &self,
        postcode: &str,
        max_results: Option<u32>,
    ) -> Result<GeocodeResponse, GeocodeError> {
        let mut url = format!(
            "{}/search/places/v1/postcode?postcode={}&key={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(postcode),
            urlencoding::encode(&self.api_key),
        );
        if let Some(max) = max_results {
            url.push_str(&format!("&maxresults={max}"));
        }

        tracing::debug!("OS Places lookup for {}", postcode);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GeocodeError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            return Err(GeocodeError::Rejected {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(GeocodeError::Unavailable(format!(
                "provider returned status {status}"
            )));
        }

        let body: OsPlacesResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Unavailable(format!("invalid provider response: {e}")))?;

        Ok(body.into())
    }
}

#[async_trait]
impl GeocodingProvider for OsPlacesClient {
    async fn geocode_full(&self, postcode: &str) -> Result<GeocodeResponse, GeocodeError> {
        self.postcode_lookup(postcode, None).await
    }

    async fn geocode_partial(
        &self,
        outward: &str,
        max_results: u32,
    ) -> Result<GeocodeResponse, GeocodeError> {
        self.postcode_lookup(outward, Some(max_results)).await
    }
}

/// OS Places wire format. `results` is null or absent for a postcode the
/// provider knows nothing about; that is "not found", not a failure.
#[derive(Debug, Deserialize)]
struct OsPlacesResponse {
    #[serde(default)]
    results: Option<Vec<OsPlacesEntry>>,
}

#[derive(Debug, Deserialize)]
struct OsPlacesEntry {
    #[serde(rename = "DPA")]
    dpa: Option<OsPlacesDpa>,
}

#[derive(Debug, Deserialize)]
struct OsPlacesDpa {
    #[serde(rename = "LAT")]
    lat: f64,
    #[serde(rename = "LNG")]
    lng: f64,
    #[serde(rename = "LOCAL_CUSTODIAN_CODE")]
    local_custodian_code: Option<i64>,
}

impl From<OsPlacesResponse> for GeocodeResponse {
    fn from(response: OsPlacesResponse) -> Self {
        let results = response
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| entry.dpa)
            .map(|dpa| GeocodeResult {
                custodian_code: dpa.local_custodian_code,
                lat: dpa.lat,
                lng: dpa.lng,
            })
            .collect();
        Self { results }
    }
}
