//! Cafe catalog server library.
//!
//! The HTTP surface, storage, and catalog service live here so the binary
//! stays thin and the integration tests can build the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
