use serde::{Deserialize, Serialize};

/// Citizen intent behind a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchAction {
    Nearest,
    Documents,
    Update,
}

/// Whether a service area follows the civil or family routing rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceAreaType {
    Civil,
    Family,
    Other,
}

impl ServiceAreaType {
    /// Parse the value stored in the reference data, defaulting to `Other`.
    pub fn from_db(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "civil" => Self::Civil,
            "family" => Self::Family,
            _ => Self::Other,
        }
    }
}

/// How courts are matched to a location for a service area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatchmentMethod {
    Distance,
    LocalAuthority,
}

impl CatchmentMethod {
    pub fn from_db(value: &str) -> Self {
        match value.to_lowercase().replace(' ', "_").as_str() {
            "local_authority" => Self::LocalAuthority,
            _ => Self::Distance,
        }
    }
}

/// Catchment scope of one court within a service area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatchmentType {
    Local,
    Regional,
}

impl CatchmentType {
    pub fn from_db(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "regional" => Self::Regional,
            _ => Self::Local,
        }
    }
}

/// Service areas routed straight to the single point of entry query.
///
/// TODO: replace the display-name comparison with a flag on the service area
/// record; renaming the area in the admin data would silently break routing.
const SINGLE_POINT_OF_ENTRY_AREAS: &[&str] = &["Childcare arrangements"];

/// Read-only service area reference data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAreaConfig {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub area_type: ServiceAreaType,
    #[serde(rename = "catchmentMethod")]
    pub catchment_method: CatchmentMethod,
    #[serde(rename = "areaOfLaw")]
    pub area_of_law: String,
}

impl ServiceAreaConfig {
    /// Whether searches for this area bypass strategy selection entirely.
    pub fn is_single_point_of_entry(&self) -> bool {
        SINGLE_POINT_OF_ENTRY_AREAS
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&self.name))
    }
}

/// Catchment configuration for one (court, service area) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtCatchmentConfig {
    #[serde(rename = "courtId")]
    pub court_id: i64,
    #[serde(rename = "catchmentType")]
    pub catchment_type: CatchmentType,
}

/// One address entry from the geocoding provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(rename = "custodianCode")]
    pub custodian_code: Option<i64>,
    pub lat: f64,
    pub lng: f64,
}

/// Geocoding provider response; an empty result set is a valid
/// "not found" answer, not a transport failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

/// A geocoded search origin with its resolved local authority, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResult {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "authorityName")]
    pub authority_name: Option<String>,
    #[serde(rename = "outwardCode")]
    pub outward_code: String,
}

/// A court row returned by one of the ranked-court queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtCandidate {
    pub slug: String,
    pub name: String,
    /// Straight-line distance in statute miles, when the query computes one
    pub distance: Option<f64>,
    /// Set by the civil postcode query when the court's registered
    /// postcode-district catchment contains the searched postcode
    #[serde(default)]
    pub postcode_match: bool,
}

/// A court in the final ranked result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCourt {
    pub slug: String,
    pub name: String,
    #[serde(rename = "distanceMiles")]
    pub distance_miles: Option<f64>,
    /// 1-based position within the returned list
    pub rank: u32,
    /// False for single-point-of-entry results, where the assignment is
    /// fixed rather than proximity-based
    #[serde(rename = "byProximity")]
    pub by_proximity: bool,
}
