//! Catalog error types.

use thiserror::Error;

use cafe_catalog_core::{CafeFormError, CafeId};

use crate::db::RepositoryError;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A submitted field is missing or malformed.
    #[error("validation failed: {0}")]
    Validation(#[from] CafeFormError),

    /// A cafe with the same name already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No cafe has this ID.
    #[error("cafe {0} not found")]
    NotFound(CafeId),

    /// A random pick was requested from an empty catalog.
    #[error("the catalog is empty")]
    EmptyCollection,

    /// The supplied shared secret does not match.
    #[error("invalid api key")]
    Unauthorized,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
