//! Test fixtures and data generators
//!
//! Names are unique per run so tests can share one database.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::helpers::{assert_json, TestServer};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!(
        "{}{}{}",
        std::process::id(),
        nanos % 100_000,
        COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

/// Registration request
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("reader{suffix}"),
            email: format!("reader{suffix}@example.com"),
            password: "TestPass123".to_string(),
        }
    }
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

/// Refresh request
#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Auth response
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// User response
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub bio: Option<String>,
}

/// Create club request
#[derive(Debug, Serialize)]
pub struct CreateClubRequest {
    pub name: String,
    pub genre: Option<String>,
    pub is_private: bool,
    pub max_members: Option<i32>,
}

impl CreateClubRequest {
    pub fn unique() -> Self {
        Self {
            name: format!("Test Club {}", unique_suffix()),
            genre: Some("Mystery".to_string()),
            is_private: false,
            max_members: None,
        }
    }
}

/// Club response
#[derive(Debug, Deserialize)]
pub struct ClubResponse {
    pub id: String,
    pub name: String,
    pub owner_id: Option<String>,
    pub members_count: i32,
    pub is_private: bool,
}

/// Member response
#[derive(Debug, Deserialize)]
pub struct MemberResponse {
    pub user_id: String,
    pub role: String,
    pub is_approved: bool,
    pub is_owner: bool,
}

/// A registered user with its tokens
pub struct TestUser {
    pub id: String,
    pub token: String,
    pub register: RegisterRequest,
}

/// Register a fresh user
pub async fn register_user(server: &TestServer) -> Result<TestUser> {
    let register = RegisterRequest::unique();
    let response = server.post("/api/v1/auth/register", &register).await?;
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await?;
    Ok(TestUser {
        id: auth.user.id,
        token: auth.access_token,
        register,
    })
}

/// Create a club owned by `owner`
pub async fn create_club(
    server: &TestServer,
    owner: &TestUser,
    request: &CreateClubRequest,
) -> Result<ClubResponse> {
    let response = server
        .post_auth("/api/v1/clubs", &owner.token, request)
        .await?;
    assert_json(response, StatusCode::CREATED).await
}

/// Join a club as `user`
pub async fn join_club(server: &TestServer, club_id: &str, user: &TestUser) -> Result<MemberResponse> {
    let response = server
        .post_empty_auth(&format!("/api/v1/clubs/{club_id}/join"), &user.token)
        .await?;
    assert_json(response, StatusCode::CREATED).await
}

/// Fetch a club as `viewer`
pub async fn get_club(server: &TestServer, club_id: &str, viewer: &TestUser) -> Result<ClubResponse> {
    let response = server
        .get_auth(&format!("/api/v1/clubs/{club_id}"), &viewer.token)
        .await?;
    assert_json(response, StatusCode::OK).await
}

/// List member user ids of a club as `viewer`
pub async fn member_ids(server: &TestServer, club_id: &str, viewer: &TestUser) -> Result<Vec<String>> {
    let response = server
        .get_auth(&format!("/api/v1/clubs/{club_id}/members"), &viewer.token)
        .await?;
    let members: Vec<MemberResponse> = assert_json(response, StatusCode::OK).await?;
    Ok(members.into_iter().map(|m| m.user_id).collect())
}
