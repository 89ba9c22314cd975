//! Authentication service
//!
//! Handles user registration, login, and token refresh.

use club_common::auth::{hash_password, validate_password_strength, verify_password};
use club_common::AppError;
use club_core::entities::User;
use club_core::DomainError;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{
    AuthResponse, CurrentUserResponse, LoginRequest, RefreshTokenRequest, RegisterRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        validate_password_strength(&request.password)?;

        let email = request.email.trim().to_lowercase();
        let username = request.username.trim().to_string();

        if self.ctx.user_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }
        if self.ctx.user_repo().username_exists(&username).await? {
            return Err(DomainError::UsernameTaken.into());
        }

        let password_hash = hash_password(&request.password)?;

        let mut user = User::new(self.ctx.generate_id(), username, email);
        user.display_name = request.display_name;

        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, "User registered successfully");

        self.issue_tokens(&user, None)
    }

    /// Login with email and password
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        info!(user_id = %user.id, "User logged in successfully");

        self.issue_tokens(&user, None)
    }

    /// Exchange a refresh token for a new token pair in the same session
    #[instrument(skip(self, request))]
    pub async fn refresh_tokens(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let user_id = claims.user_id()?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))?;

        info!(user_id = %user.id, "Tokens refreshed successfully");

        self.issue_tokens(&user, claims.sid)
    }

    fn issue_tokens(&self, user: &User, session_id: Option<String>) -> ServiceResult<AuthResponse> {
        let sid = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let pair = self.ctx.jwt_service().issue(user.id, Some(sid))?;

        Ok(AuthResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            user: CurrentUserResponse::from(user),
        })
    }
}
