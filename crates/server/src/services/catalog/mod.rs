//! Catalog service.
//!
//! Orchestrates the cafe repository and the listing filter for each
//! operation the HTTP layer exposes. The service is cheap to build and is
//! constructed per request from a pool and explicit [`CatalogSettings`].

mod error;

pub use error::CatalogError;

use rand::Rng;
use sqlx::SqlitePool;
use tracing::{info, warn};

use cafe_catalog_core::types::cafe::{MAX_TEXT_LENGTH, check_length, non_blank_price};
use cafe_catalog_core::{
    Cafe, CafeFilter, CafeForm, CafeId, FilterCriteria, FilterSelection, build_filter,
};

use crate::config::CatalogSettings;
use crate::db::RepositoryError;
use crate::db::cafes::CafeRepository;

/// Cafes matching a listing request, plus the filter state to redisplay.
#[derive(Debug, Clone)]
pub struct FilteredListing {
    pub cafes: Vec<Cafe>,
    pub selection: FilterSelection,
}

/// Outcome of an exact-location search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationSearch {
    /// At least one cafe is in the location, ordered by ID.
    Found(Vec<Cafe>),
    /// No cafe is in the location.
    NoMatch,
}

/// Catalog service.
pub struct CatalogService<'a> {
    cafes: CafeRepository<'a>,
    settings: &'a CatalogSettings,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, settings: &'a CatalogSettings) -> Self {
        Self {
            cafes: CafeRepository::new(pool),
            settings,
        }
    }

    /// Listing page on first load: every cafe, every location checked.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store cannot be read.
    pub async fn default_listing(&self) -> Result<FilteredListing, CatalogError> {
        let locations = self.cafes.distinct_locations().await?;
        let cafes = self.cafes.list(&CafeFilter::match_all()).await?;

        Ok(FilteredListing {
            cafes,
            selection: FilterSelection::defaults(&locations),
        })
    }

    /// List cafes matching the submitted filter criteria.
    ///
    /// An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store cannot be read.
    pub async fn list_filtered(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<FilteredListing, CatalogError> {
        let locations = self.cafes.distinct_locations().await?;
        let (filter, selection) = build_filter(&locations, criteria);
        let cafes = self.cafes.list(&filter).await?;

        Ok(FilteredListing { cafes, selection })
    }

    /// Every cafe, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store cannot be read.
    pub async fn list_all(&self) -> Result<Vec<Cafe>, CatalogError> {
        Ok(self.cafes.list(&CafeFilter::match_all()).await?)
    }

    /// A cafe chosen uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyCollection` if there are no cafes.
    pub async fn random_pick(&self) -> Result<Cafe, CatalogError> {
        let mut cafes = self.cafes.list(&CafeFilter::match_all()).await?;
        if cafes.is_empty() {
            return Err(CatalogError::EmptyCollection);
        }

        let index = rand::rng().random_range(0..cafes.len());
        Ok(cafes.swap_remove(index))
    }

    /// Cafes whose location equals `location` exactly (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store cannot be read.
    pub async fn search_by_location(&self, location: &str) -> Result<LocationSearch, CatalogError> {
        let cafes = self.cafes.list_by_location(location).await?;
        if cafes.is_empty() {
            Ok(LocationSearch::NoMatch)
        } else {
            Ok(LocationSearch::Found(cafes))
        }
    }

    /// Get a single cafe.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no cafe has this ID.
    pub async fn get(&self, id: CafeId) -> Result<Cafe, CatalogError> {
        self.cafes
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Validate and store a new cafe.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if a required field is missing or malformed.
    /// Returns `CatalogError::Conflict` if the name is already taken.
    pub async fn create(&self, form: CafeForm) -> Result<CafeId, CatalogError> {
        let cafe = form.validate()?;

        let id = self.cafes.insert(&cafe).await.map_err(|e| match e {
            RepositoryError::Conflict(msg) => CatalogError::Conflict(msg),
            other => CatalogError::Repository(other),
        })?;

        info!(cafe_id = %id, name = %cafe.name, "Cafe created");
        Ok(id)
    }

    /// Replace a cafe's coffee price. An absent or blank price clears it,
    /// the same rule `create` applies.
    ///
    /// The price is free-form text.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no cafe has this ID.
    /// Returns `CatalogError::Validation` if the price exceeds its column length.
    pub async fn update_price(
        &self,
        id: CafeId,
        new_price: Option<String>,
    ) -> Result<(), CatalogError> {
        let new_price = non_blank_price(new_price);
        if let Some(price) = &new_price {
            check_length("new_price", price, MAX_TEXT_LENGTH)?;
        }

        self.cafes
            .update_price(id, new_price.as_deref())
            .await
            .map_err(|e| not_found_as(id, e))?;

        info!(cafe_id = %id, "Coffee price updated");
        Ok(())
    }

    /// Check a caller-supplied key against the shared secret.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unauthorized` if the key is missing or wrong.
    pub fn authorize(&self, api_key: Option<&str>) -> Result<(), CatalogError> {
        if self.settings.authorizes(api_key) {
            Ok(())
        } else {
            warn!("Rejected request with invalid api key");
            Err(CatalogError::Unauthorized)
        }
    }

    /// Delete a cafe, authorized by the shared secret.
    ///
    /// The secret is checked before the ID is looked up, so unauthorized
    /// callers cannot probe which IDs exist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unauthorized` if the key is missing or wrong.
    /// Returns `CatalogError::NotFound` if the key is right but no cafe has this ID.
    pub async fn delete(&self, id: CafeId, api_key: Option<&str>) -> Result<(), CatalogError> {
        self.authorize(api_key)?;

        self.cafes.delete(id).await.map_err(|e| not_found_as(id, e))?;

        info!(cafe_id = %id, "Cafe deleted");
        Ok(())
    }
}

fn not_found_as(id: CafeId, err: RepositoryError) -> CatalogError {
    match err {
        RepositoryError::NotFound => CatalogError::NotFound(id),
        other => CatalogError::Repository(other),
    }
}
