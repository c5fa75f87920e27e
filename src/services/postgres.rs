use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::core::errors::SearchError;
use crate::core::executor::CourtQueries;
use crate::core::facade::ReferenceData;
use crate::core::resolver::AuthorityLookup;
use crate::models::{
    CatchmentMethod, CatchmentType, CourtCandidate, CourtCatchmentConfig, ServiceAreaConfig,
    ServiceAreaType,
};

/// PostgreSQL client backing the ranked-court queries, the local-authority
/// lookup, and the service-area reference data.
///
/// Distances come from the earthdistance `<@>` point operator, which
/// returns statute miles.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
    }

    async fn fetch_candidates(
        &self,
        query: sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments>,
    ) -> Result<Vec<CourtCandidate>, SearchError> {
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(SearchError::backend)?;

        Ok(rows
            .iter()
            .map(|row| CourtCandidate {
                slug: row.get("slug"),
                name: row.get("name"),
                distance: row.try_get("distance").ok(),
                postcode_match: row.try_get("postcode_match").unwrap_or(false),
            })
            .collect())
    }
}

#[async_trait]
impl CourtQueries for PostgresClient {
    async fn find_nearest(
        &self,
        lat: f64,
        lon: f64,
        limit: usize,
    ) -> Result<Vec<CourtCandidate>, SearchError> {
        let query = r#"
            SELECT c.slug, c.name,
                   (point(c.lon, c.lat) <@> point($2, $1))::float8 AS distance
            FROM search_court c
            WHERE c.displayed AND c.lat IS NOT NULL AND c.lon IS NOT NULL
            ORDER BY distance
            LIMIT $3
        "#;

        self.fetch_candidates(
            sqlx::query(query)
                .bind(lat)
                .bind(lon)
                .bind(limit as i64),
        )
        .await
    }

    async fn find_nearest_by_area_of_law(
        &self,
        lat: f64,
        lon: f64,
        area_of_law: &str,
        limit: usize,
    ) -> Result<Vec<CourtCandidate>, SearchError> {
        let query = r#"
            SELECT c.slug, c.name,
                   (point(c.lon, c.lat) <@> point($2, $1))::float8 AS distance
            FROM search_court c
            JOIN search_courtareaoflaw caol ON caol.court_id = c.id
            JOIN search_areaoflaw aol ON aol.id = caol.area_of_law_id
            WHERE aol.name = $3
              AND c.displayed AND c.lat IS NOT NULL AND c.lon IS NOT NULL
            ORDER BY distance
            LIMIT $4
        "#;

        self.fetch_candidates(
            sqlx::query(query)
                .bind(lat)
                .bind(lon)
                .bind(area_of_law)
                .bind(limit as i64),
        )
        .await
    }

    async fn find_by_postcode_catchment(
        &self,
        lat: f64,
        lon: f64,
        area_of_law: &str,
        postcode: &str,
    ) -> Result<Vec<CourtCandidate>, SearchError> {
        // postcode_match is true when the searched postcode starts with one
        // of the court's registered catchment districts.
        let query = r#"
            SELECT c.slug, c.name,
                   (point(c.lon, c.lat) <@> point($2, $1))::float8 AS distance,
                   EXISTS (
                       SELECT 1 FROM search_courtpostcode cp
                       WHERE cp.court_id = c.id
                         AND replace(upper($4), ' ', '')
                             LIKE replace(upper(cp.postcode), ' ', '') || '%'
                   ) AS postcode_match
            FROM search_court c
            JOIN search_courtareaoflaw caol ON caol.court_id = c.id
            JOIN search_areaoflaw aol ON aol.id = caol.area_of_law_id
            WHERE aol.name = $3
              AND c.displayed AND c.lat IS NOT NULL AND c.lon IS NOT NULL
            ORDER BY postcode_match DESC, distance
        "#;

        self.fetch_candidates(
            sqlx::query(query)
                .bind(lat)
                .bind(lon)
                .bind(area_of_law)
                .bind(postcode),
        )
        .await
    }

    async fn find_regional(
        &self,
        lat: f64,
        lon: f64,
        service_area_id: i64,
    ) -> Result<Vec<CourtCandidate>, SearchError> {
        let query = r#"
            SELECT c.slug, c.name,
                   (point(c.lon, c.lat) <@> point($2, $1))::float8 AS distance
            FROM search_court c
            JOIN search_serviceareacourt sac ON sac.court_id = c.id
            WHERE sac.service_area_id = $3
              AND lower(sac.catchment_type) = 'regional'
              AND c.displayed AND c.lat IS NOT NULL AND c.lon IS NOT NULL
            ORDER BY distance
        "#;

        self.fetch_candidates(
            sqlx::query(query)
                .bind(lat)
                .bind(lon)
                .bind(service_area_id),
        )
        .await
    }

    async fn find_by_local_authority(
        &self,
        lat: f64,
        lon: f64,
        authority_name: &str,
        service_area_id: i64,
    ) -> Result<Vec<CourtCandidate>, SearchError> {
        let query = r#"
            SELECT c.slug, c.name,
                   (point(c.lon, c.lat) <@> point($2, $1))::float8 AS distance
            FROM search_court c
            JOIN search_serviceareacourt sac ON sac.court_id = c.id
            JOIN search_courtlocalauthority cla ON cla.court_id = c.id
            JOIN search_localauthority la ON la.id = cla.local_authority_id
            WHERE sac.service_area_id = $3
              AND lower(sac.catchment_type) = 'local'
              AND la.name = $4
              AND c.displayed AND c.lat IS NOT NULL AND c.lon IS NOT NULL
            ORDER BY distance
        "#;

        self.fetch_candidates(
            sqlx::query(query)
                .bind(lat)
                .bind(lon)
                .bind(service_area_id)
                .bind(authority_name),
        )
        .await
    }

    async fn find_nearest_spoe(
        &self,
        lat: f64,
        lon: f64,
        area_of_law: &str,
    ) -> Result<Vec<CourtCandidate>, SearchError> {
        let query = r#"
            SELECT c.slug, c.name,
                   (point(c.lon, c.lat) <@> point($2, $1))::float8 AS distance
            FROM search_court c
            JOIN search_courtareaoflaw caol ON caol.court_id = c.id
            JOIN search_areaoflaw aol ON aol.id = caol.area_of_law_id
            WHERE aol.name = $3
              AND caol.single_point_of_entry
              AND c.displayed AND c.lat IS NOT NULL AND c.lon IS NOT NULL
            ORDER BY distance
        "#;

        self.fetch_candidates(
            sqlx::query(query)
                .bind(lat)
                .bind(lon)
                .bind(area_of_law),
        )
        .await
    }
}

#[async_trait]
impl AuthorityLookup for PostgresClient {
    async fn authority_name(&self, custodian_code: i64) -> Result<Option<String>, SearchError> {
        // A child authority reports under its parent's name when one exists.
        let query = r#"
            SELECT COALESCE(parent.name, la.name) AS name
            FROM search_localauthority la
            LEFT JOIN search_localauthority parent ON parent.id = la.parent_id
            WHERE la.custodian_code = $1
        "#;

        let row = sqlx::query(query)
            .bind(custodian_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(SearchError::backend)?;

        Ok(row.map(|r| r.get("name")))
    }
}

#[async_trait]
impl ReferenceData for PostgresClient {
    async fn service_area(&self, name: &str) -> Result<Option<ServiceAreaConfig>, SearchError> {
        let query = r#"
            SELECT sa.id, sa.name, sa.slug, sa.type, sa.catchment_method,
                   aol.name AS area_of_law
            FROM search_servicearea sa
            JOIN search_areaoflaw aol ON aol.id = sa.area_of_law_id
            WHERE sa.slug = lower($1) OR lower(sa.name) = lower($1)
        "#;

        let row = sqlx::query(query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(SearchError::backend)?;

        Ok(row.map(|r| {
            let area_type: String = r.get("type");
            let catchment_method: String = r.get("catchment_method");
            ServiceAreaConfig {
                id: r.get("id"),
                name: r.get("name"),
                slug: r.get("slug"),
                area_type: ServiceAreaType::from_db(&area_type),
                catchment_method: CatchmentMethod::from_db(&catchment_method),
                area_of_law: r.get("area_of_law"),
            }
        }))
    }

    async fn court_catchments(
        &self,
        service_area_id: i64,
    ) -> Result<Vec<CourtCatchmentConfig>, SearchError> {
        let query = r#"
            SELECT court_id, catchment_type
            FROM search_serviceareacourt
            WHERE service_area_id = $1
        "#;

        let rows = sqlx::query(query)
            .bind(service_area_id)
            .fetch_all(&self.pool)
            .await
            .map_err(SearchError::backend)?;

        Ok(rows
            .iter()
            .map(|row| {
                let catchment_type: String = row.get("catchment_type");
                CourtCatchmentConfig {
                    court_id: row.get("court_id"),
                    catchment_type: CatchmentType::from_db(&catchment_type),
                }
            })
            .collect())
    }
}
