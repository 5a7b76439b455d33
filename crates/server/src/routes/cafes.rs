//! JSON API route handlers.
//!
//! Successful mutations answer `{ "response": { "success": <message> } }`;
//! reads answer `{ "cafe": ... }` or `{ "cafes": [...] }`. Errors go through
//! [`AppError`].
//!
//! A rejected API key answers 403 with the common error shape,
//! `{ "error": { "Forbidden": "Not valid API key used." } }`. Older clients
//! that read `{ "response": { "error": ... } }` from this endpoint need to
//! switch to the `error` object.

use axum::{
    Form, Json,
    extract::{Path, Query, State, rejection::FormRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use cafe_catalog_core::{Cafe, CafeForm, CafeId};

use crate::error::{AppError, CAFE_NOT_FOUND_MESSAGE, LOCATION_NOT_FOUND_MESSAGE, Result};
use crate::services::catalog::LocationSearch;
use crate::state::AppState;

/// A single cafe.
#[derive(Debug, Serialize)]
pub struct CafeResponse {
    pub cafe: Cafe,
}

/// A list of cafes.
#[derive(Debug, Serialize)]
pub struct CafesResponse {
    pub cafes: Vec<Cafe>,
}

/// Acknowledgement of a successful mutation.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub response: SuccessBody,
}

#[derive(Debug, Serialize)]
pub struct SuccessBody {
    pub success: &'static str,
}

impl SuccessResponse {
    const fn new(message: &'static str) -> Self {
        Self {
            response: SuccessBody { success: message },
        }
    }
}

/// `GET /search` query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub loc: String,
}

/// `/update-price/{id}` query parameters.
#[derive(Debug, Deserialize)]
pub struct UpdatePriceQuery {
    pub new_price: Option<String>,
}

/// `/report-closed/{id}` query parameters.
#[derive(Deserialize)]
pub struct ApiKeyQuery {
    pub api_key: Option<String>,
}

/// Parse a path segment as a cafe ID.
///
/// A segment that is not a number cannot name a cafe, so it reads as not found.
fn parse_cafe_id(raw: &str) -> Option<CafeId> {
    raw.parse::<i64>().ok().map(CafeId::new)
}

/// A random cafe.
#[instrument(skip(state))]
pub async fn random(State(state): State<AppState>) -> Result<Json<CafeResponse>> {
    let cafe = state.catalog().random_pick().await?;
    Ok(Json(CafeResponse { cafe }))
}

/// Every cafe, ordered by ID.
#[instrument(skip(state))]
pub async fn all(State(state): State<AppState>) -> Result<Json<CafesResponse>> {
    let cafes = state.catalog().list_all().await?;
    Ok(Json(CafesResponse { cafes }))
}

/// Cafes in exactly the given location.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<CafesResponse>> {
    match state.catalog().search_by_location(&query.loc).await? {
        LocationSearch::Found(cafes) => Ok(Json(CafesResponse { cafes })),
        LocationSearch::NoMatch => Err(AppError::NotFound(
            LOCATION_NOT_FOUND_MESSAGE.to_string(),
        )),
    }
}

/// Create a cafe from a form submission.
#[instrument(skip(state, form))]
pub async fn add(
    State(state): State<AppState>,
    form: std::result::Result<Form<CafeForm>, FormRejection>,
) -> Result<Json<SuccessResponse>> {
    let Form(form) = form.map_err(|e| AppError::BadRequest(e.body_text()))?;
    state.catalog().create(form).await?;
    Ok(Json(SuccessResponse::new("Successfully added the new cafe.")))
}

/// Replace a cafe's coffee price.
#[instrument(skip(state))]
pub async fn update_price(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(query): Query<UpdatePriceQuery>,
) -> Result<Json<SuccessResponse>> {
    let id = parse_cafe_id(&raw_id)
        .ok_or_else(|| AppError::NotFound(CAFE_NOT_FOUND_MESSAGE.to_string()))?;

    state.catalog().update_price(id, query.new_price).await?;
    Ok(Json(SuccessResponse::new("Successfully updated chosen cafe.")))
}

/// Delete a cafe reported as closed. Requires the shared API key.
#[instrument(skip(state, query))]
pub async fn report_closed(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(query): Query<ApiKeyQuery>,
) -> Result<Json<SuccessResponse>> {
    let catalog = state.catalog();
    let api_key = query.api_key.as_deref();

    match parse_cafe_id(&raw_id) {
        Some(id) => catalog.delete(id, api_key).await?,
        None => {
            // Authorization still decides first.
            catalog.authorize(api_key)?;
            return Err(AppError::NotFound(CAFE_NOT_FOUND_MESSAGE.to_string()));
        }
    }

    Ok(Json(SuccessResponse::new(
        "Successfully deleted selected cafe.",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cafe_id() {
        assert_eq!(parse_cafe_id("12"), Some(CafeId::new(12)));
        assert_eq!(parse_cafe_id("twelve"), None);
        assert_eq!(parse_cafe_id(""), None);
    }

    #[test]
    fn test_success_response_shape() {
        let value = serde_json::to_value(SuccessResponse::new("done")).unwrap_or_default();
        assert_eq!(value["response"]["success"], "done");
    }
}
