/// Organization and membership endpoints
///
/// The `org_id` path parameter on scoped routes feeds the tenant scope
/// resolver; the org-role guards on the router enforce minimum organization
/// roles before these handlers run.
///
/// # Endpoints
///
/// - `POST   /v1/orgs` - Create organization (creator becomes org super admin)
/// - `GET    /v1/orgs/:org_id` - Get organization
/// - `GET    /v1/orgs/:org_id/members` - List members
/// - `POST   /v1/orgs/:org_id/members` - Add member (org manager+)
/// - `PUT    /v1/orgs/:org_id/members/:user_id` - Change member role (org manager+)
/// - `DELETE /v1/orgs/:org_id/members/:user_id` - Remove member (org manager+)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskhive_shared::{
    auth::middleware::{CurrentUser, TenantScope},
    models::{
        membership::{CreateMembership, Membership, OrgRole},
        organization::{CreateOrganization, Organization, OrganizationPlan},
        user::User,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create organization request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// URL-safe unique identifier
    #[validate(length(min = 3, max = 63, message = "Slug must be 3-63 characters"))]
    pub slug: String,

    /// Billing plan (defaults to free)
    pub plan: Option<OrganizationPlan>,
}

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: Uuid,

    /// Organization role (defaults to member)
    pub role: Option<OrgRole>,
}

/// Change member role request
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRoleRequest {
    /// New organization role
    pub role: OrgRole,
}

/// Creates an organization
///
/// The creating user is added as the organization's super admin in the same
/// transaction, so a fresh organization is never ownerless.
pub async fn create_organization(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(req): Json<CreateOrganizationRequest>,
) -> ApiResult<(StatusCode, Json<Organization>)> {
    req.validate()?;

    let organization = Organization::create(
        &state.db,
        CreateOrganization {
            name: req.name,
            slug: req.slug.to_lowercase(),
            plan: req.plan.unwrap_or(OrganizationPlan::Free),
        },
    )
    .await?;

    Membership::create(
        &state.db,
        CreateMembership {
            organization_id: organization.id,
            user_id: actor.id,
            role: OrgRole::SuperAdmin,
        },
    )
    .await?;

    tracing::info!(
        organization_id = %organization.id,
        creator_id = %actor.id,
        "Created organization"
    );

    Ok((StatusCode::CREATED, Json(organization)))
}

/// Gets the organization the request is scoped to
pub async fn get_organization(
    State(state): State<AppState>,
    Extension(scope): Extension<TenantScope>,
) -> ApiResult<Json<Organization>> {
    let organization = Organization::find_by_id(&state.db, scope.organization_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))?;

    Ok(Json(organization))
}

/// Lists the organization's members
pub async fn list_members(
    State(state): State<AppState>,
    Extension(scope): Extension<TenantScope>,
) -> ApiResult<Json<Vec<Membership>>> {
    let members = Membership::list_by_organization(&state.db, scope.organization_id).await?;
    Ok(Json(members))
}

/// Adds a user to the organization
pub async fn add_member(
    State(state): State<AppState>,
    Extension(scope): Extension<TenantScope>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<Membership>)> {
    // Confirm the user exists so the FK violation doesn't surface as a 409
    User::find_by_id(&state.db, req.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let membership = Membership::create(
        &state.db,
        CreateMembership {
            organization_id: scope.organization_id,
            user_id: req.user_id,
            role: req.role.unwrap_or(OrgRole::Member),
        },
    )
    .await?;

    tracing::info!(
        organization_id = %scope.organization_id,
        user_id = %req.user_id,
        role = membership.role.as_str(),
        "Added organization member"
    );

    Ok((StatusCode::CREATED, Json(membership)))
}

/// Changes a member's organization role
pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(scope): Extension<TenantScope>,
    Path((_org_id, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateMemberRoleRequest>,
) -> ApiResult<Json<Membership>> {
    let membership = Membership::update_role(&state.db, scope.organization_id, user_id, req.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("Membership not found".to_string()))?;

    Ok(Json(membership))
}

/// Removes a member from the organization
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Extension(scope): Extension<TenantScope>,
    Path((_org_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    if user_id == actor.id {
        return Err(ApiError::BadRequest(
            "Cannot remove yourself from an organization".to_string(),
        ));
    }

    let removed = Membership::delete(&state.db, scope.organization_id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Membership not found".to_string()));
    }

    tracing::info!(
        organization_id = %scope.organization_id,
        user_id = %user_id,
        "Removed organization member"
    );

    Ok(StatusCode::NO_CONTENT)
}
