//! Integration test utilities for the book club API
//!
//! This crate provides helpers for running end-to-end tests against the REST
//! API over real HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
