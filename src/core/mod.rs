// Search core exports
pub mod errors;
pub mod executor;
pub mod facade;
pub mod postcode;
pub mod resolver;
pub mod strategy;

pub use errors::SearchError;
pub use executor::{CourtQueries, SearchExecutor};
pub use facade::{CourtDiscoveryFacade, ReferenceData};
pub use postcode::{classify, ClassifiedPostcode, Region};
pub use resolver::{AuthorityLookup, GeoAuthorityResolver, GeocodeError, GeocodingProvider};
pub use strategy::{select, SearchStrategy};
