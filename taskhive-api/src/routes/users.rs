/// User profile and administration endpoints
///
/// `/v1/me` serves the authenticated user's own profile. `/v1/users` is the
/// administration surface and sits behind the Admin minimum-role guard.
///
/// # Endpoints
///
/// - `GET /v1/me` - Own profile
/// - `PUT /v1/me` - Update own display name
/// - `GET /v1/users` - List users (Admin+)
/// - `PUT /v1/users/:user_id/role` - Change a user's global role (Admin+)
/// - `PUT /v1/users/:user_id/active` - Activate/deactivate an account (Admin+)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use taskhive_shared::{
    auth::{
        authorization::{require_action, Action, Resource},
        middleware::CurrentUser,
    },
    models::user::{Role, User},
};
use uuid::Uuid;
use validator::Validate;

/// Update own profile request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    /// New display name; null clears it
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

/// Change global role request
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// New global role
    pub role: Role,
}

/// Activate/deactivate request
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    /// New active flag
    pub is_active: bool,
}

/// User list pagination
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Page size (default 50, max 200)
    pub limit: Option<i64>,

    /// Offset into the listing
    pub offset: Option<i64>,
}

/// Returns the authenticated user's profile
pub async fn get_me(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, actor.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Updates the authenticated user's display name
pub async fn update_me(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(req): Json<UpdateMeRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    require_action(&actor, Action::Update, Some(&Resource::user_profile(actor.id)))?;

    let user = User::update_name(&state.db, actor.id, req.name)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Lists user accounts, newest first
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<Vec<User>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let users = User::list(&state.db, limit, offset).await?;
    Ok(Json(users))
}

/// Changes a user's global role
pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<User>> {
    let user = User::update_role(&state.db, user_id, req.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(
        user_id = %user.id,
        role = user.role.as_str(),
        changed_by = %actor.id,
        "Changed user role"
    );

    Ok(Json(user))
}

/// Activates or deactivates a user account
pub async fn set_user_active(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<SetActiveRequest>,
) -> ApiResult<Json<User>> {
    if user_id == actor.id && !req.is_active {
        return Err(ApiError::BadRequest(
            "Cannot deactivate your own account".to_string(),
        ));
    }

    let user = User::set_active(&state.db, user_id, req.is_active)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(
        user_id = %user.id,
        is_active = user.is_active,
        changed_by = %actor.id,
        "Changed account status"
    );

    Ok(Json(user))
}
