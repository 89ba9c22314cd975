//! Membership handlers
//!
//! Endpoints for joining, leaving, and owner-side member management.

use axum::{
    extract::{Path, State},
    Json,
};
use club_core::DomainError;
use club_service::dto::{
    LeaveClubRequest, LeaveResponse, ManageAccessResponse, MemberResponse,
    UpdateMemberRoleRequest,
};
use club_service::{MembershipService, ServiceError};

use crate::extractors::{AuthUser, ClubIdPath, ClubUserPath, OptionalJson, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// List club members
///
/// GET /clubs/{club_id}/members
pub async fn get_club_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ClubIdPath>,
) -> ApiResult<Json<Vec<MemberResponse>>> {
    let service = MembershipService::new(state.service_context());
    let members = service.list_members(path.club_id()?, auth.user_id).await?;
    Ok(Json(members))
}

/// Get club member by user ID
///
/// GET /clubs/{club_id}/members/{user_id}
pub async fn get_club_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ClubUserPath>,
) -> ApiResult<Json<MemberResponse>> {
    let service = MembershipService::new(state.service_context());
    let member = service
        .get_member(path.club_id()?, path.user_id()?, auth.user_id)
        .await?;
    Ok(Json(member))
}

/// Join a club
///
/// POST /clubs/{club_id}/join
pub async fn join_club(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ClubIdPath>,
) -> ApiResult<Created<Json<MemberResponse>>> {
    let service = MembershipService::new(state.service_context());
    let member = service.join_club(path.club_id()?, auth.user_id).await?;
    Ok(Created(Json(member)))
}

/// Approve a pending member
///
/// POST /clubs/{club_id}/members/{user_id}/approve
pub async fn approve_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ClubUserPath>,
) -> ApiResult<Json<MemberResponse>> {
    let service = MembershipService::new(state.service_context());
    let member = service
        .approve_member(path.club_id()?, auth.user_id, path.user_id()?)
        .await?;
    Ok(Json(member))
}

/// Change a member's role
///
/// PATCH /clubs/{club_id}/members/{user_id}
pub async fn update_member_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ClubUserPath>,
    ValidatedJson(request): ValidatedJson<UpdateMemberRoleRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let service = MembershipService::new(state.service_context());
    let member = service
        .set_member_role(path.club_id()?, auth.user_id, path.user_id()?, request)
        .await?;
    Ok(Json(member))
}

/// Remove a member (kick)
///
/// DELETE /clubs/{club_id}/members/{user_id}
pub async fn remove_club_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ClubUserPath>,
) -> ApiResult<NoContent> {
    let service = MembershipService::new(state.service_context());
    service
        .kick_member(path.club_id()?, auth.user_id, path.user_id()?)
        .await?;
    Ok(NoContent)
}

/// Leave a club
///
/// POST /clubs/{club_id}/leave
///
/// The owner must send `{"action": "transfer", "new_owner_id": ...}` or
/// `{"action": "close"}`. Everyone else may send no body at all.
pub async fn leave_club(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ClubIdPath>,
    OptionalJson(body): OptionalJson<LeaveClubRequest>,
) -> ApiResult<Json<LeaveResponse>> {
    let service = MembershipService::new(state.service_context());
    let response = service
        .leave_club(path.club_id()?, auth.user_id, body)
        .await
        .map_err(leave_error)?;
    Ok(Json(response))
}

/// Whether the caller may manage the club
///
/// GET /clubs/{club_id}/manage
pub async fn can_manage_club(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ClubIdPath>,
) -> ApiResult<Json<ManageAccessResponse>> {
    let service = MembershipService::new(state.service_context());
    let response = service.can_manage_club(path.club_id()?, auth.user_id).await?;
    Ok(Json(response))
}

/// Leave failures caused by the request itself are all reported as 400,
/// an unknown or closed club included
fn leave_error(err: ServiceError) -> ApiError {
    match err {
        ServiceError::Domain(e @ DomainError::ClubNotFound(_)) => ApiError::Rejected(e),
        ServiceError::Domain(e) if e.is_leave_rejection() => ApiError::Rejected(e),
        other => ApiError::Service(other),
    }
}
