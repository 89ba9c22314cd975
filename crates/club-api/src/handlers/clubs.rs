//! Club handlers
//!
//! Endpoints for club creation, browsing, and owner edits.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use club_service::dto::{
    ClubFilter, ClubResponse, CreateClubRequest, PageResponse, UpdateClubRequest,
};
use club_service::ClubService;

use crate::extractors::{AuthUser, ClubIdPath, Pagination, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Create a club owned by the caller
///
/// POST /clubs
pub async fn create_club(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateClubRequest>,
) -> ApiResult<Created<Json<ClubResponse>>> {
    let service = ClubService::new(state.service_context());
    let response = service.create_club(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Browse public clubs
///
/// GET /clubs?genre=&location=&limit=&offset=
pub async fn list_clubs(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filter): Query<ClubFilter>,
    pagination: Pagination,
) -> ApiResult<Json<PageResponse<ClubResponse>>> {
    let service = ClubService::new(state.service_context());
    let page = service
        .list_clubs(filter, pagination.limit, pagination.offset)
        .await?;
    Ok(Json(page))
}

/// Get club
///
/// GET /clubs/{club_id}
pub async fn get_club(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ClubIdPath>,
) -> ApiResult<Json<ClubResponse>> {
    let service = ClubService::new(state.service_context());
    let response = service.get_club(path.club_id()?, auth.user_id).await?;
    Ok(Json(response))
}

/// Update club
///
/// PATCH /clubs/{club_id}
pub async fn update_club(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ClubIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateClubRequest>,
) -> ApiResult<Json<ClubResponse>> {
    let service = ClubService::new(state.service_context());
    let response = service
        .update_club(path.club_id()?, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// Delete club
///
/// DELETE /clubs/{club_id}
pub async fn delete_club(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ClubIdPath>,
) -> ApiResult<NoContent> {
    let service = ClubService::new(state.service_context());
    service.delete_club(path.club_id()?, auth.user_id).await?;
    Ok(NoContent)
}
