//! HTTP request handlers
//!
//! Handlers extract request data, call the service layer, and shape responses.

pub mod auth;
pub mod clubs;
pub mod health;
pub mod members;
pub mod users;
