//! Core types for the cafe catalog.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod cafe;
pub mod flag;
pub mod id;

pub use cafe::{Amenity, Cafe, CafeForm, CafeFormError, NewCafe};
pub use flag::AmenityFlag;
pub use id::*;
