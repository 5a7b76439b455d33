//! Listing page route handlers.
//!
//! `GET /` shows every cafe with every location checked. `POST /` applies the
//! submitted filter form. The form is decoded by hand because `location`
//! repeats, once per checked box.

use askama::Template;
use askama_web::WebTemplate;
use axum::{body::Bytes, extract::State};
use tracing::instrument;

use cafe_catalog_core::{
    Amenity, AmenityFlag, Cafe, FilterCriteria, FilterSelection, LocationOption,
};

use crate::error::Result;
use crate::services::catalog::FilteredListing;
use crate::state::AppState;

/// One amenity selector on the filter form.
#[derive(Clone)]
pub struct AmenityView {
    /// Form field name.
    pub field: &'static str,
    pub label: &'static str,
    /// Currently selected form value (`""`, `"True"` or `"False"`).
    pub value: &'static str,
}

impl AmenityView {
    fn new(amenity: Amenity, flag: AmenityFlag) -> Self {
        let label = match amenity {
            Amenity::Toilet => "Toilet",
            Amenity::Wifi => "Wi-Fi",
            Amenity::Sockets => "Sockets",
            Amenity::Calls => "Can take calls",
        };

        Self {
            field: amenity.column(),
            label,
            value: flag.as_form_value(),
        }
    }
}

/// Listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub cafes: Vec<Cafe>,
    pub locations: Vec<LocationOption>,
    pub amenities: Vec<AmenityView>,
}

impl From<FilteredListing> for HomeTemplate {
    fn from(listing: FilteredListing) -> Self {
        let FilteredListing { cafes, selection } = listing;
        let FilterSelection {
            locations,
            has_toilet,
            has_wifi,
            has_sockets,
            can_take_calls,
        } = selection;

        Self {
            cafes,
            locations,
            amenities: vec![
                AmenityView::new(Amenity::Toilet, has_toilet),
                AmenityView::new(Amenity::Wifi, has_wifi),
                AmenityView::new(Amenity::Sockets, has_sockets),
                AmenityView::new(Amenity::Calls, can_take_calls),
            ],
        }
    }
}

/// Display the unfiltered listing page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<HomeTemplate> {
    let listing = state.catalog().default_listing().await?;
    Ok(listing.into())
}

/// Apply the submitted filter form and display the matching cafes.
#[instrument(skip(state, body))]
pub async fn filter(State(state): State<AppState>, body: Bytes) -> Result<HomeTemplate> {
    let criteria = FilterCriteria::from_form_pairs(url::form_urlencoded::parse(&body));
    tracing::debug!(?criteria, "Filtering listing");

    let listing = state.catalog().list_filtered(&criteria).await?;
    Ok(listing.into())
}
