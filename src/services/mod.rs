// Service exports
pub mod os_places;
pub mod postgres;

pub use os_places::OsPlacesClient;
pub use postgres::PostgresClient;
