//! Business logic services for the catalog server.
//!
//! # Services
//!
//! - `catalog` - Listing, search, random pick and cafe curation

pub mod catalog;
