/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Refresh access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskhive_shared::{
    auth::{
        jwt::{self, Claims, TokenType},
        password,
    },
    models::user::{CreateUser, Role, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Token pair response for register and login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// User ID
    pub user_id: String,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

fn issue_token_pair(state: &AppState, user: &User) -> ApiResult<TokenResponse> {
    let access = jwt::create_token(&Claims::new(user.id, TokenType::Access), state.jwt_secret())?;
    let refresh = jwt::create_token(&Claims::new(user.id, TokenType::Refresh), state.jwt_secret())?;

    Ok(TokenResponse {
        user_id: user.id.to_string(),
        access_token: access,
        refresh_token: refresh,
    })
}

/// Registers a new user account
///
/// New accounts get the base `user` role; elevated roles are granted later by
/// an administrator. Organizations are joined separately.
///
/// # Errors
///
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email.to_lowercase(),
            password_hash,
            name: req.name,
            role: Role::User,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "Registered new user");

    let tokens = issue_token_pair(&state, &user)?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

/// Authenticates a user and issues a token pair
///
/// The same 401 is returned for an unknown email and a wrong password so the
/// endpoint doesn't leak which emails exist.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
/// - `403 Forbidden`: Account is deactivated
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email.to_lowercase())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is deactivated".to_string()));
    }

    User::touch_last_login(&state.db, user.id).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    let tokens = issue_token_pair(&state, &user)?;
    Ok(Json(tokens))
}

/// Exchanges a refresh token for a new access token
///
/// The user row is re-checked so deactivated accounts cannot keep minting
/// access tokens from an old refresh token.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token
/// - `403 Forbidden`: Account is deactivated
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let claims = jwt::validate_refresh_token(&req.refresh_token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is deactivated".to_string()));
    }

    let access_token =
        jwt::create_token(&Claims::new(user.id, TokenType::Access), state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
