use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{CourtDiscoveryFacade, SearchError};
use crate::models::{ErrorResponse, HealthResponse, SearchAction, SearchQuery, SearchResponse};
use crate::services::PostgresClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub facade: Arc<CourtDiscoveryFacade>,
    pub postgres: Arc<PostgresClient>,
    pub max_limit: u16,
}

/// Configure all search-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/search/results", web::get().to(search));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Court search endpoint
///
/// GET /api/v1/search/results?postcode=SW1A+1AA&serviceArea=money-claims&action=documents&limit=10
async fn search(state: web::Data<AppState>, query: web::Query<SearchQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let action = match query.action.as_deref() {
        None => None,
        Some(raw) => match parse_action(raw) {
            Some(action) => Some(action),
            None => {
                return HttpResponse::BadRequest().json(ErrorResponse {
                    error: "invalid_action".to_string(),
                    message: "Action must be one of: nearest, documents, update".to_string(),
                    status_code: 400,
                });
            }
        },
    };

    let limit = query.limit.min(state.max_limit).max(1) as usize;

    tracing::info!(
        "Searching courts for postcode {}, serviceArea {:?}, action {:?}, limit {}",
        query.postcode,
        query.service_area,
        query.action,
        limit
    );

    match state
        .facade
        .search(&query.postcode, query.service_area.as_deref(), action, limit)
        .await
    {
        Ok(courts) => {
            tracing::info!("Returning {} courts for {}", courts.len(), query.postcode);
            let total_results = courts.len();
            HttpResponse::Ok().json(SearchResponse {
                courts,
                total_results,
            })
        }
        Err(err) => {
            let status = error_status(&err);
            if status >= 500 {
                tracing::error!("Search failed for {}: {}", query.postcode, err);
            } else {
                tracing::info!("Search rejected for {}: {}", query.postcode, err);
            }
            HttpResponse::build(
                actix_web::http::StatusCode::from_u16(status)
                    .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
            )
            .json(ErrorResponse {
                error: err.kind().to_string(),
                message: err.to_string(),
                status_code: status,
            })
        }
    }
}

fn parse_action(raw: &str) -> Option<SearchAction> {
    match raw.to_lowercase().as_str() {
        "nearest" => Some(SearchAction::Nearest),
        "documents" => Some(SearchAction::Documents),
        "update" => Some(SearchAction::Update),
        _ => None,
    }
}

/// Map each error kind to its transport status code.
fn error_status(err: &SearchError) -> u16 {
    match err {
        SearchError::InvalidPostcode(_)
        | SearchError::UnsupportedRegion { .. }
        | SearchError::InvalidParameterCombination => 400,
        SearchError::NoAddressResults(_)
        | SearchError::NoCustodianCode(_)
        | SearchError::ServiceAreaNotFound(_) => 404,
        SearchError::AmbiguousAuthority { .. } | SearchError::AuthorityNotFound(_) => 422,
        SearchError::GeocodingUnavailable(_) => 502,
        SearchError::Backend(_) => 500,
    }
}
