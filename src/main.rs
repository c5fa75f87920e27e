mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use config::Settings;
use core::{CourtDiscoveryFacade, GeoAuthorityResolver, SearchExecutor};
use routes::search::AppState;
use services::{OsPlacesClient, PostgresClient};

/// JSON error response for malformed query strings
#[derive(Debug, serde::Serialize)]
pub struct QueryError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for QueryError {}

impl error::ResponseError for QueryError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string()))
    }
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    QueryError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt().with_target(false).with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting courtfinder search service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize the OS Places geocoding client
    let os_places = Arc::new(OsPlacesClient::new(
        settings.os_places.url,
        settings.os_places.api_key,
        Duration::from_secs(settings.os_places.timeout_secs),
    ));

    info!("OS Places client initialized");

    // Initialize the PostgreSQL client
    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let db_min_conn = settings.database.min_connections.unwrap_or(1);

    let postgres = Arc::new(
        PostgresClient::new(&settings.database.url, db_max_conn, db_min_conn)
            .await
            .unwrap_or_else(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                panic!("PostgreSQL connection error: {}", e);
            }),
    );

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    // Wire the search core: resolver -> strategy -> executor behind the facade
    let authorities: Arc<dyn core::AuthorityLookup> = postgres.clone();
    let queries: Arc<dyn core::CourtQueries> = postgres.clone();
    let reference: Arc<dyn core::ReferenceData> = postgres.clone();

    let resolver = GeoAuthorityResolver::new(os_places, authorities);
    let executor = SearchExecutor::new(queries);
    let facade = Arc::new(CourtDiscoveryFacade::new(resolver, executor, reference));

    // Build application state
    let app_state = AppState {
        facade,
        postgres,
        max_limit: settings.search.max_limit,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
