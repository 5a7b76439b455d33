//! Cafe Catalog Core - Shared types library.
//!
//! This crate provides the types used across the cafe catalog components:
//! - `server` - HTTP service exposing listing, search and mutation endpoints
//! - `integration-tests` - End-to-end tests against an in-memory database
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. The listing filter lives here so that its semantics can be
//! tested without a store.
//!
//! # Modules
//!
//! - [`types`] - Cafe records, type-safe IDs and the tri-state amenity flag
//! - [`filter`] - Filter criteria, the listing predicate and redisplay state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod filter;
pub mod types;

pub use filter::*;
pub use types::*;
