//! API Integration Tests
//!
//! These tests require a running PostgreSQL instance and `DATABASE_URL`.
//! `REDIS_URL` is optional and enables the user cache.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

async fn start() -> Option<TestServer> {
    if !check_test_env() {
        return None;
    }
    Some(TestServer::start().await.expect("Failed to start server"))
}

fn leave_path(club_id: &str) -> String {
    format!("/api/v1/clubs/{club_id}/leave")
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let Some(server) = start().await else { return };

    for path in ["/health", "/health/live"] {
        let response = server.get(path).await.unwrap();
        let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(body["status"], "healthy");
    }
}

#[tokio::test]
async fn test_health_ready_reports_database() {
    let Some(server) = start().await else { return };

    let response = server.get("/health/ready").await.unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let Some(server) = start().await else { return };

    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_and_login() {
    let Some(server) = start().await else { return };

    let user = register_user(&server).await.unwrap();

    let login = LoginRequest::from_register(&user.register);
    let response = server.post("/api/v1/auth/login", &login).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(auth.user.id, user.id);
    assert_eq!(auth.user.username, user.register.username);
    assert!(auth.expires_in > 0);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let Some(server) = start().await else { return };

    let user = register_user(&server).await.unwrap();
    let response = server
        .post("/api/v1/auth/register", &user.register)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "EMAIL_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_register_validation() {
    let Some(server) = start().await else { return };

    let mut request = RegisterRequest::unique();
    request.email = "not-an-email".to_string();
    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let Some(server) = start().await else { return };

    let login = LoginRequest {
        email: "nobody@example.com".to_string(),
        password: "wrongpass1".to_string(),
    };
    let response = server.post("/api/v1/auth/login", &login).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_refresh_token() {
    let Some(server) = start().await else { return };

    let register = RegisterRequest::unique();
    let response = server.post("/api/v1/auth/register", &register).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let refresh = RefreshTokenRequest {
        refresh_token: auth.refresh_token,
    };
    let response = server.post("/api/v1/auth/refresh", &refresh).await.unwrap();
    let refreshed: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!refreshed.access_token.is_empty());
    assert_eq!(refreshed.user.id, auth.user.id);
}

#[tokio::test]
async fn test_requires_authentication() {
    let Some(server) = start().await else { return };

    let response = server.get("/api/v1/users/@me").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");

    let response = server
        .get_auth("/api/v1/users/@me", "not-a-jwt")
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// User Tests
// ============================================================================

#[tokio::test]
async fn test_profile_update() {
    let Some(server) = start().await else { return };
    let user = register_user(&server).await.unwrap();

    let response = server
        .patch_auth("/api/v1/users/@me", &user.token, &json!({"bio": "Reads on trains"}))
        .await
        .unwrap();
    let me: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.bio.as_deref(), Some("Reads on trains"));
    assert_eq!(me.email.as_deref(), Some(user.register.email.as_str()));

    let other = register_user(&server).await.unwrap();
    let response = server
        .get_auth(&format!("/api/v1/users/{}", user.id), &other.token)
        .await
        .unwrap();
    let public: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(public.bio.as_deref(), Some("Reads on trains"));
    assert!(public.email.is_none());
}

// ============================================================================
// Club Tests
// ============================================================================

#[tokio::test]
async fn test_create_club() {
    let Some(server) = start().await else { return };
    let owner = register_user(&server).await.unwrap();

    let request = CreateClubRequest::unique();
    let club = create_club(&server, &owner, &request).await.unwrap();
    assert_eq!(club.name, request.name);
    assert_eq!(club.owner_id.as_deref(), Some(owner.id.as_str()));
    assert_eq!(club.members_count, 1);

    let response = server
        .get_auth(
            &format!("/api/v1/clubs/{}/members/{}", club.id, owner.id),
            &owner.token,
        )
        .await
        .unwrap();
    let founder: MemberResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(founder.role, "admin");
    assert!(founder.is_approved);
    assert!(founder.is_owner);

    let response = server
        .post_auth("/api/v1/clubs", &owner.token, &request)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "CLUB_NAME_TAKEN");
}

#[tokio::test]
async fn test_club_owner_only_edits() {
    let Some(server) = start().await else { return };
    let owner = register_user(&server).await.unwrap();
    let other = register_user(&server).await.unwrap();
    let club = create_club(&server, &owner, &CreateClubRequest::unique())
        .await
        .unwrap();
    let path = format!("/api/v1/clubs/{}", club.id);

    let response = server
        .patch_auth(&path, &other.token, &json!({"description": "hijacked"}))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_CLUB_OWNER");

    let response = server
        .patch_auth(&path, &owner.token, &json!({"description": "Monthly meetups"}))
        .await
        .unwrap();
    let updated: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated["description"], "Monthly meetups");

    let response = server
        .get_auth(&format!("{path}/manage"), &other.token)
        .await
        .unwrap();
    let access: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(access["can_manage"], false);

    let response = server.delete_auth(&path, &owner.token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth(&path, &owner.token).await.unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_CLUB");
}

#[tokio::test]
async fn test_private_club_visibility() {
    let Some(server) = start().await else { return };
    let owner = register_user(&server).await.unwrap();
    let outsider = register_user(&server).await.unwrap();

    let mut request = CreateClubRequest::unique();
    request.is_private = true;
    let club = create_club(&server, &owner, &request).await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/clubs/{}", club.id), &outsider.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "PRIVATE_CLUB");

    // A pending applicant can see the club
    let pending = join_club(&server, &club.id, &outsider).await.unwrap();
    assert!(!pending.is_approved);
    let seen = get_club(&server, &club.id, &outsider).await.unwrap();
    assert!(seen.is_private);
}

#[tokio::test]
async fn test_list_clubs() {
    let Some(server) = start().await else { return };
    let owner = register_user(&server).await.unwrap();

    let mut request = CreateClubRequest::unique();
    request.genre = Some(format!("Genre{}", unique_suffix()));
    let club = create_club(&server, &owner, &request).await.unwrap();

    let genre = request.genre.unwrap_or_default().to_lowercase();
    let response = server
        .get_auth(&format!("/api/v1/clubs?genre={genre}&limit=5"), &owner.token)
        .await
        .unwrap();
    let page: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page["limit"], 5);
    let ids: Vec<&str> = page["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["id"].as_str())
        .collect();
    assert_eq!(ids, vec![club.id.as_str()]);

    let response = server
        .get_auth("/api/v1/users/@me/clubs", &owner.token)
        .await
        .unwrap();
    let mine: Vec<serde_json::Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(mine.iter().any(|c| c["id"] == club.id.as_str()));
}

// ============================================================================
// Membership Tests
// ============================================================================

#[tokio::test]
async fn test_join_rules() {
    let Some(server) = start().await else { return };
    let owner = register_user(&server).await.unwrap();
    let reader = register_user(&server).await.unwrap();
    let late = register_user(&server).await.unwrap();

    let mut request = CreateClubRequest::unique();
    request.max_members = Some(2);
    let club = create_club(&server, &owner, &request).await.unwrap();

    let member = join_club(&server, &club.id, &reader).await.unwrap();
    assert!(member.is_approved);
    assert_eq!(member.role, "member");

    let join_path = format!("/api/v1/clubs/{}/join", club.id);
    let response = server.post_empty_auth(&join_path, &reader.token).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ALREADY_MEMBER");

    let response = server.post_empty_auth(&join_path, &late.token).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "CLUB_FULL");

    assert_eq!(get_club(&server, &club.id, &owner).await.unwrap().members_count, 2);
}

#[tokio::test]
async fn test_owner_manages_members() {
    let Some(server) = start().await else { return };
    let owner = register_user(&server).await.unwrap();
    let applicant = register_user(&server).await.unwrap();

    let mut request = CreateClubRequest::unique();
    request.is_private = true;
    let club = create_club(&server, &owner, &request).await.unwrap();
    join_club(&server, &club.id, &applicant).await.unwrap();

    let member_path = format!("/api/v1/clubs/{}/members/{}", club.id, applicant.id);

    let response = server
        .post_empty_auth(&format!("{member_path}/approve"), &applicant.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .post_empty_auth(&format!("{member_path}/approve"), &owner.token)
        .await
        .unwrap();
    let approved: MemberResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(approved.is_approved);

    let response = server
        .patch_auth(&member_path, &owner.token, &json!({"role": "moderator"}))
        .await
        .unwrap();
    let promoted: MemberResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(promoted.role, "moderator");

    let owner_path = format!("/api/v1/clubs/{}/members/{}", club.id, owner.id);
    let response = server.delete_auth(&owner_path, &owner.token).await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "CANNOT_KICK_OWNER");

    let response = server.delete_auth(&member_path, &owner.token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    assert_eq!(
        member_ids(&server, &club.id, &owner).await.unwrap(),
        vec![owner.id.clone()]
    );
}

// ============================================================================
// Leave Protocol Tests
// ============================================================================

#[tokio::test]
async fn test_member_leaves_without_body() {
    let Some(server) = start().await else { return };
    let owner = register_user(&server).await.unwrap();
    let reader = register_user(&server).await.unwrap();
    let club = create_club(&server, &owner, &CreateClubRequest::unique())
        .await
        .unwrap();
    join_club(&server, &club.id, &reader).await.unwrap();

    let response = server
        .post_empty_auth(&leave_path(&club.id), &reader.token)
        .await
        .unwrap();
    let outcome: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(outcome["status"], "left");
    assert_eq!(outcome["members_count"], 1);

    let response = server
        .post_empty_auth(&leave_path(&club.id), &reader.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "NOT_A_MEMBER");
}

#[tokio::test]
async fn test_owner_leave_rejections() {
    let Some(server) = start().await else { return };
    let owner = register_user(&server).await.unwrap();
    let pending = register_user(&server).await.unwrap();

    let mut request = CreateClubRequest::unique();
    request.is_private = true;
    let club = create_club(&server, &owner, &request).await.unwrap();
    join_club(&server, &club.id, &pending).await.unwrap();

    let path = leave_path(&club.id);
    let response = server.post_empty_auth(&path, &owner.token).await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "OWNER_DISPOSITION_REQUIRED");

    let cases = [
        (json!({"action": "transfer"}), "NEW_OWNER_REQUIRED"),
        (json!({"action": "transfer", "new_owner_id": owner.id}), "SAME_OWNER"),
        (json!({"action": "transfer", "new_owner_id": pending.id}), "NEW_OWNER_NOT_APPROVED"),
        (json!({"action": "transfer", "new_owner_id": "1"}), "NEW_OWNER_NOT_A_MEMBER"),
        (json!({"action": "dissolve"}), "INVALID_DISPOSITION"),
    ];
    for (body, expected) in cases {
        let response = server.post_auth(&path, &owner.token, &body).await.unwrap();
        let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
        assert_eq!(code, expected, "body: {body}");
    }

    let club = get_club(&server, &club.id, &owner).await.unwrap();
    assert_eq!(club.owner_id.as_deref(), Some(owner.id.as_str()));
    assert_eq!(club.members_count, 2);
}

#[tokio::test]
async fn test_owner_transfers_then_new_owner_closes() {
    let Some(server) = start().await else { return };
    let u1 = register_user(&server).await.unwrap();
    let u2 = register_user(&server).await.unwrap();
    let u3 = register_user(&server).await.unwrap();
    let club = create_club(&server, &u1, &CreateClubRequest::unique())
        .await
        .unwrap();
    join_club(&server, &club.id, &u2).await.unwrap();
    join_club(&server, &club.id, &u3).await.unwrap();

    let path = leave_path(&club.id);
    let response = server
        .post_auth(
            &path,
            &u1.token,
            &json!({"action": "transfer", "new_owner_id": u2.id}),
        )
        .await
        .unwrap();
    let outcome: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(outcome["status"], "transferred");
    assert_eq!(outcome["new_owner_id"], u2.id.as_str());
    assert_eq!(outcome["members_count"], 2);

    let after = get_club(&server, &club.id, &u2).await.unwrap();
    assert_eq!(after.owner_id.as_deref(), Some(u2.id.as_str()));
    assert_eq!(
        member_ids(&server, &club.id, &u2).await.unwrap(),
        vec![u2.id.clone(), u3.id.clone()]
    );

    let response = server
        .post_auth(&path, &u2.token, &json!({"action": "close"}))
        .await
        .unwrap();
    let outcome: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(outcome["status"], "closed");

    // Closed clubs are gone for everyone, and leaving again is a bad request
    let response = server.post_empty_auth(&path, &u3.token).await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "UNKNOWN_CLUB");

    let response = server
        .get_auth("/api/v1/users/@me/clubs", &u3.token)
        .await
        .unwrap();
    let clubs: Vec<serde_json::Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(clubs.iter().all(|c| c["id"] != club.id.as_str()));
}

#[tokio::test]
async fn test_concurrent_transfers() {
    let Some(server) = start().await else { return };
    let owner = register_user(&server).await.unwrap();
    let b = register_user(&server).await.unwrap();
    let c = register_user(&server).await.unwrap();
    let club = create_club(&server, &owner, &CreateClubRequest::unique())
        .await
        .unwrap();
    join_club(&server, &club.id, &b).await.unwrap();
    join_club(&server, &club.id, &c).await.unwrap();

    let path = leave_path(&club.id);
    let to_b = json!({"action": "transfer", "new_owner_id": b.id});
    let to_c = json!({"action": "transfer", "new_owner_id": c.id});
    let (first, second) = futures::join!(
        server.post_auth(&path, &owner.token, &to_b),
        server.post_auth(&path, &owner.token, &to_c),
    );

    let statuses = [first.unwrap().status(), second.unwrap().status()];
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert!(statuses.contains(&StatusCode::BAD_REQUEST));

    let after = get_club(&server, &club.id, &b).await.unwrap();
    assert!(after.owner_id == Some(b.id.clone()) || after.owner_id == Some(c.id.clone()));
    assert_eq!(after.members_count, 2);
}
