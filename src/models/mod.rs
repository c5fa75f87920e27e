// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CatchmentMethod, CatchmentType, CourtCandidate, CourtCatchmentConfig, GeocodeResponse,
    GeocodeResult, LocationResult, RankedCourt, SearchAction, ServiceAreaConfig, ServiceAreaType,
};
pub use requests::SearchQuery;
pub use responses::{ErrorResponse, HealthResponse, SearchResponse};
