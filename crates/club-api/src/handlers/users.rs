//! User handlers
//!
//! Endpoints for user profile management.

use axum::{
    extract::{Path, State},
    Json,
};
use club_service::dto::{ClubResponse, CurrentUserResponse, UpdateUserRequest, UserResponse};
use club_service::{MembershipService, UserService};

use crate::extractors::{AuthUser, UserIdPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Get current user
///
/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get_current_user(auth.user_id).await?;
    Ok(Json(response))
}

/// Update current user
///
/// PATCH /users/@me
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.update_current_user(auth.user_id, request).await?;
    Ok(Json(response))
}

/// Clubs the current user belongs to, pending memberships included
///
/// GET /users/@me/clubs
pub async fn get_current_user_clubs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ClubResponse>>> {
    let service = MembershipService::new(state.service_context());
    let clubs = service.list_user_clubs(auth.user_id).await?;
    Ok(Json(clubs))
}

/// Get user by ID
///
/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<UserIdPath>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get_user(path.user_id()?).await?;
    Ok(Json(response))
}
