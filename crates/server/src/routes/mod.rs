//! HTTP route handlers for the cafe catalog.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                      - Listing page, every location checked
//! POST   /                      - Listing page, filtered by the submitted form
//! GET    /health                - Liveness check
//! GET    /health/ready          - Readiness check (database reachable)
//!
//! # JSON API
//! GET    /random                - One cafe picked uniformly at random
//! GET    /all                   - Every cafe, ordered by ID
//! GET    /search?loc=           - Cafes in exactly the given location
//! POST   /add                   - Create a cafe from form fields
//! PATCH  /update-price/{id}     - Replace the coffee price (`?new_price=`)
//! DELETE /report-closed/{id}    - Delete a cafe (`?api_key=`)
//! ```

pub mod cafes;
pub mod home;

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::from_fn,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/random", get(cafes::random))
        .route("/all", get(cafes::all))
        .route("/search", get(cafes::search))
        .route("/add", post(cafes::add))
        .route(
            "/update-price/{id}",
            patch(cafes::update_price).post(cafes::update_price),
        )
        .route("/report-closed/{id}", delete(cafes::report_closed))
}

/// Create all catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home).post(home::filter))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(api_routes())
}

/// Build the complete application with middleware and state applied.
///
/// Sentry layers are left to the binary so tests can drive the router
/// without a client bound.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
