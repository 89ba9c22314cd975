//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, clubs, health, members, users};
use crate::state::AppState;

/// Create the API router (health routes are kept out of rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(club_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/@me",
            get(users::get_current_user).patch(users::update_current_user),
        )
        .route("/users/@me/clubs", get(users::get_current_user_clubs))
        .route("/users/:user_id", get(users::get_user))
}

/// Club routes
fn club_routes() -> Router<AppState> {
    Router::new()
        // Club CRUD
        .route("/clubs", post(clubs::create_club).get(clubs::list_clubs))
        .route(
            "/clubs/:club_id",
            get(clubs::get_club)
                .patch(clubs::update_club)
                .delete(clubs::delete_club),
        )
        // Membership lifecycle
        .route("/clubs/:club_id/join", post(members::join_club))
        .route("/clubs/:club_id/leave", post(members::leave_club))
        .route("/clubs/:club_id/manage", get(members::can_manage_club))
        // Member management
        .route("/clubs/:club_id/members", get(members::get_club_members))
        .route(
            "/clubs/:club_id/members/:user_id",
            get(members::get_club_member)
                .patch(members::update_member_role)
                .delete(members::remove_club_member),
        )
        .route(
            "/clubs/:club_id/members/:user_id/approve",
            post(members::approve_member),
        )
}
