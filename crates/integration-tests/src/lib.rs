//! Integration tests for the cafe catalog.
//!
//! Every test gets its own in-memory `SQLite` database, so nothing needs to
//! be running beforehand:
//!
//! ```bash
//! cargo test -p cafe-catalog-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_service` - query service behavior against a real store
//! - `http_api` - JSON endpoints driven through the router
//! - `listing_page` - the filterable HTML listing

use std::net::{IpAddr, Ipv4Addr};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use sqlx::SqlitePool;
use tower::ServiceExt;

use cafe_catalog_core::{CafeForm, CafeId};
use cafe_catalog_server::config::{CatalogConfig, CatalogSettings};
use cafe_catalog_server::db;
use cafe_catalog_server::services::catalog::CatalogService;
use cafe_catalog_server::state::AppState;

/// API key the test settings accept.
pub const TEST_API_KEY: &str = "k3y-Fr0m-T3st5-0nly";

/// Largest response body the helpers will read.
const MAX_BODY_BYTES: usize = 1024 * 1024;

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// A fresh in-memory database with the schema applied.
///
/// # Errors
///
/// Returns `sqlx::Error` if the pool or schema cannot be created.
pub async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let pool = db::create_pool(&SecretString::from("sqlite::memory:")).await?;
    db::init_schema(&pool).await?;
    Ok(pool)
}

/// Catalog settings holding [`TEST_API_KEY`].
#[must_use]
pub fn test_settings() -> CatalogSettings {
    CatalogSettings::new(TEST_API_KEY)
}

/// Server configuration for an in-memory store and no Sentry.
#[must_use]
pub fn test_config() -> CatalogConfig {
    CatalogConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        catalog: test_settings(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A complete, valid creation form with every amenity off and no price.
#[must_use]
pub fn cafe_form(name: &str, location: &str) -> CafeForm {
    CafeForm {
        name: Some(name.to_string()),
        map_url: Some(format!("https://maps.example.com/{}", name.replace(' ', "+"))),
        img_url: Some(format!("https://img.example.com/{}.jpg", name.replace(' ', "-"))),
        location: Some(location.to_string()),
        seats: Some("20-30".to_string()),
        has_toilet: Some("False".to_string()),
        has_wifi: Some("False".to_string()),
        has_sockets: Some("False".to_string()),
        can_take_calls: Some("False".to_string()),
        coffee_price: None,
    }
}

/// Render a boolean the way the creation form expects it.
#[must_use]
pub fn form_bool(value: bool) -> Option<String> {
    Some(if value { "True" } else { "False" }.to_string())
}

/// Store every form through the catalog service, returning IDs in order.
///
/// # Errors
///
/// Returns the first creation failure.
pub async fn seed(pool: &SqlitePool, forms: Vec<CafeForm>) -> TestResult<Vec<CafeId>> {
    let settings = test_settings();
    let catalog = CatalogService::new(pool, &settings);

    let mut ids = Vec::with_capacity(forms.len());
    for form in forms {
        ids.push(catalog.create(form).await?);
    }
    Ok(ids)
}

/// A router wired exactly as the binary wires it, minus Sentry.
pub struct TestApp {
    pub pool: SqlitePool,
    router: Router,
}

/// A response read to completion.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the body is not JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

impl TestApp {
    /// Build an app over a fresh in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the store cannot be created.
    pub async fn new() -> Result<Self, sqlx::Error> {
        let pool = memory_pool().await?;
        let state = AppState::new(test_config(), pool.clone());
        let router = cafe_catalog_server::routes::app(state);
        Ok(Self { pool, router })
    }

    /// Send a request without a body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body read.
    pub async fn send(&self, method: Method, uri: &str) -> TestResult<TestResponse> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())?;
        self.request(request).await
    }

    /// Send an `application/x-www-form-urlencoded` body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body read.
    pub async fn send_form(&self, method: Method, uri: &str, body: &str) -> TestResult<TestResponse> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))?;
        self.request(request).await
    }

    /// Send a fully built request.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be read or is not UTF-8.
    pub async fn request(&self, request: Request<Body>) -> TestResult<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES).await?;
        Ok(TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec())?,
        })
    }
}
